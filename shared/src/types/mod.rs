//! Core types used throughout the allocator

use crate::errors::SharedError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Whole currency units. Budgets are integer-quantized so that engine
/// budgets can sum to the campaign total exactly.
pub type Amount = u64;

/// Convert a user-entered number into an [`Amount`].
///
/// Negative and NaN input clamps to 0, fractions round to the nearest unit
/// and anything past `u64::MAX` saturates.
pub fn clamp_amount(value: f64) -> Amount {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    // `as` saturates for out-of-range floats, including +inf
    value.round() as Amount
}

/// Clamp a ROAS multiplier to a finite, non-negative value
pub fn clamp_roas(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Clamp a percentage to `[0, 100]`, mapping NaN to 0
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Stable identifier for an advertising engine (a.k.a. proposition)
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineId(String);

impl EngineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EngineId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EngineId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier for one allocator session (one mounted campaign view)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the campaign total is split across enabled engines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    /// Weighted by each engine's base ROAS
    #[default]
    Auto,

    /// Equal split across enabled engines
    Even,

    /// Budgets are set per engine and the total follows their sum
    Manual,
}

impl AllocationMode {
    /// Whether budgets are derived from the total (as opposed to user-set)
    pub fn redistributes(&self) -> bool {
        !matches!(self, AllocationMode::Manual)
    }
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationMode::Auto => write!(f, "auto"),
            AllocationMode::Even => write!(f, "even"),
            AllocationMode::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for AllocationMode {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "roas" | "weighted" => Ok(AllocationMode::Auto),
            "even" | "equal" => Ok(AllocationMode::Even),
            "manual" => Ok(AllocationMode::Manual),
            _ => Err(SharedError::UnknownMode { input: s.to_string() }),
        }
    }
}
