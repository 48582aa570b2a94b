//! Availability classification for calendar-style rendering
//!
//! A media slot's weekly availability is either a signed fill percentage or
//! the `MC` (multi-client) sentinel. [`classify`] maps it to one of four
//! display bands. The function is total and keeps no state.

use serde::{Deserialize, Serialize};
use shared::SharedError;
use std::fmt;
use std::str::FromStr;

/// Values at or below this percentage count as no availability
pub const NO_AVAILABILITY_THRESHOLD: f64 = 10.0;

/// Sentinel used by the inventory feed for shared slots
pub const MULTI_CLIENT_SENTINEL: &str = "MC";

/// Raw cell value from the inventory feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Availability {
    /// Multi-client slot, availability cannot be determined
    Unknown,
    /// Remaining capacity in percent; negative means overbooked
    Numeric(f64),
}

/// Display band of a calendar cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Overbooked,
    None,
    Unknown,
    Available,
}

impl Band {
    pub const ALL: [Band; 4] = [Band::Overbooked, Band::None, Band::Unknown, Band::Available];

    pub fn label(&self) -> &'static str {
        match self {
            Band::Available => "Available",
            Band::None => "No availability",
            Band::Unknown => "Unknown",
            Band::Overbooked => "Overbooked",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Band::Available => "cell-available",
            Band::None => "cell-none",
            Band::Unknown => "cell-unknown",
            Band::Overbooked => "cell-overbooked",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map one cell value to its band
pub fn classify(value: Availability) -> Band {
    match value {
        Availability::Unknown => Band::Unknown,
        Availability::Numeric(v) if v.is_nan() => Band::Unknown,
        Availability::Numeric(v) if v < 0.0 => Band::Overbooked,
        Availability::Numeric(v) if v <= NO_AVAILABILITY_THRESHOLD => Band::None,
        Availability::Numeric(_) => Band::Available,
    }
}

/// Classify a row of cells, one band per week
pub fn classify_row(cells: &[Availability]) -> Vec<Band> {
    cells.iter().copied().map(classify).collect()
}

impl Availability {
    pub fn band(self) -> Band {
        classify(self)
    }

    /// Parse a comma-separated row such as `"12, MC, -3, 40%"`
    pub fn parse_row(row: &str) -> Result<Vec<Self>, SharedError> {
        row.split(',')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl From<f64> for Availability {
    fn from(value: f64) -> Self {
        Availability::Numeric(value)
    }
}

impl From<i64> for Availability {
    fn from(value: i64) -> Self {
        Availability::Numeric(value as f64)
    }
}

impl FromStr for Availability {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(MULTI_CLIENT_SENTINEL) {
            return Ok(Availability::Unknown);
        }

        let numeric = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        numeric
            .parse::<f64>()
            .map(Availability::Numeric)
            .map_err(|_| SharedError::InvalidAvailability { input: s.to_string() })
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Unknown => f.write_str(MULTI_CLIENT_SENTINEL),
            Availability::Numeric(v) => write!(f, "{v}%"),
        }
    }
}

/// Cell counts per band for one calendar row or grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSummary {
    pub available: usize,
    pub none: usize,
    pub unknown: usize,
    pub overbooked: usize,
}

impl BandSummary {
    pub fn from_cells(cells: &[Availability]) -> Self {
        cells.iter().copied().map(classify).fold(Self::default(), |mut summary, band| {
            *summary.count_mut(band) += 1;
            summary
        })
    }

    pub fn count(&self, band: Band) -> usize {
        match band {
            Band::Available => self.available,
            Band::None => self.none,
            Band::Unknown => self.unknown,
            Band::Overbooked => self.overbooked,
        }
    }

    fn count_mut(&mut self, band: Band) -> &mut usize {
        match band {
            Band::Available => &mut self.available,
            Band::None => &mut self.none,
            Band::Unknown => &mut self.unknown,
            Band::Overbooked => &mut self.overbooked,
        }
    }

    pub fn total(&self) -> usize {
        self.available + self.none + self.unknown + self.overbooked
    }

    /// Most frequent band; ties prefer overbooked, none, unknown, available
    pub fn dominant(&self) -> Option<Band> {
        if self.total() == 0 {
            return None;
        }
        // max_by_key keeps the last maximum, so walk the preference order backwards
        Band::ALL.iter().rev().copied().max_by_key(|&band| self.count(band))
    }
}
