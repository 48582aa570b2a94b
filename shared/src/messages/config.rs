//! Configuration and seed types
//!
//! Engine lists use a compact text form so they can come from the command
//! line or the environment: `id:name:roas[:enabled][:budget]`, comma
//! separated. The short form `id:roas` uses the id as the display name.

use std::collections::HashSet;
use serde::{Serialize, Deserialize};
use crate::errors::{SharedError, SharedResult};
use crate::types::{clamp_amount, clamp_roas, AllocationMode, Amount, EngineId};

/// Seed record for one engine, as provided by defaults or the server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub id: EngineId,
    pub name: String,
    pub base_roas: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Starting budget, only honoured in manual mode
    #[serde(default)]
    pub budget: Option<Amount>,
}

fn default_enabled() -> bool {
    true
}

impl EngineConfig {
    pub fn new(id: impl Into<EngineId>, name: impl Into<String>, base_roas: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_roas: clamp_roas(base_roas),
            enabled: true,
            budget: None,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_budget(mut self, budget: Amount) -> Self {
        self.budget = Some(budget);
        self
    }

    /// The three propositions shown by the retail media dashboard
    pub fn retail_media_defaults() -> Vec<Self> {
        vec![
            Self::new("display", "Display Ads", 2.5),
            Self::new("sponsored", "Sponsored Products", 4.8),
            Self::new("digital", "Digital In-Store", 3.2),
        ]
    }

    /// Parse a single engine from `id:name:roas[:enabled][:budget]` or `id:roas`
    pub fn parse(entry: &str) -> SharedResult<Self> {
        let invalid = |reason: &str| SharedError::InvalidEngineEntry {
            input: entry.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
        let (id, name, roas, rest) = match parts.as_slice() {
            [id, roas] => (*id, *id, *roas, &[][..]),
            [id, name, roas, rest @ ..] if rest.len() <= 2 => (*id, *name, *roas, rest),
            _ => return Err(invalid("expected 'id:name:roas[:enabled][:budget]' or 'id:roas'")),
        };

        if id.is_empty() {
            return Err(invalid("engine id must not be empty"));
        }

        let base_roas: f64 = roas
            .parse()
            .map_err(|e| invalid(&format!("invalid roas '{roas}': {e}")))?;

        let mut engine = Self::new(id, name, base_roas);

        if let Some(flag) = rest.first() {
            engine.enabled = parse_enabled_flag(flag).ok_or_else(|| invalid(&format!("invalid enabled flag '{flag}'")))?;
        }

        if let Some(budget) = rest.get(1) {
            let amount: f64 = budget
                .parse()
                .map_err(|e| invalid(&format!("invalid budget '{budget}': {e}")))?;
            engine.budget = Some(clamp_amount(amount));
        }

        Ok(engine)
    }

    /// Parse a comma-separated engine list, rejecting duplicate ids
    pub fn parse_list(config: &str) -> SharedResult<Vec<Self>> {
        let engines = config
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Self::parse)
            .collect::<SharedResult<Vec<_>>>()?;

        ensure_unique_ids(&engines)?;
        Ok(engines)
    }
}

fn parse_enabled_flag(flag: &str) -> Option<bool> {
    match flag.to_lowercase().as_str() {
        "on" | "true" | "enabled" | "1" | "yes" => Some(true),
        "off" | "false" | "disabled" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Fail on the first id that appears twice
pub fn ensure_unique_ids(engines: &[EngineConfig]) -> SharedResult<()> {
    let mut seen = HashSet::new();
    for engine in engines {
        if !seen.insert(&engine.id) {
            return Err(SharedError::DuplicateEngineId { id: engine.id.to_string() });
        }
    }
    Ok(())
}

/// Constants of the projected reach model
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProjectionConfig {
    /// Unique shoppers reached per currency unit on a single engine
    pub reach_per_unit: f64,

    /// Extra reach fraction contributed by each additional enabled engine
    pub channel_uplift: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            reach_per_unit: 25.0,
            channel_uplift: 0.15,
        }
    }
}

impl ProjectionConfig {
    /// Load from `ALLOCATOR_REACH_PER_UNIT` and `ALLOCATOR_CHANNEL_UPLIFT`
    pub fn from_env() -> SharedResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> SharedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            reach_per_unit: read_non_negative(&lookup, "ALLOCATOR_REACH_PER_UNIT", defaults.reach_per_unit)?,
            channel_uplift: read_non_negative(&lookup, "ALLOCATOR_CHANNEL_UPLIFT", defaults.channel_uplift)?,
        })
    }
}

fn read_non_negative<F>(lookup: &F, key: &str, default: f64) -> SharedResult<f64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => {
            let value: f64 = raw.trim().parse().map_err(|_| SharedError::InvalidConfig {
                field: key.to_string(),
                value: raw.clone(),
            })?;
            Ok(clamp_roas(value))
        }
        None => Ok(default),
    }
}

/// Everything needed to seed an allocator
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CampaignConfig {
    pub total_budget: Amount,
    pub mode: AllocationMode,
    pub engines: Vec<EngineConfig>,
    #[serde(default)]
    pub projection: ProjectionConfig,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            total_budget: 5000,
            mode: AllocationMode::Auto,
            engines: EngineConfig::retail_media_defaults(),
            projection: ProjectionConfig::default(),
        }
    }
}

impl CampaignConfig {
    /// Load from environment variables
    ///
    /// - `ALLOCATOR_TOTAL_BUDGET`: campaign total (default 5000)
    /// - `ALLOCATOR_MODE`: auto|even|manual (default auto)
    /// - `ALLOCATOR_ENGINES`: engine list (default: the retail media defaults)
    pub fn from_env() -> SharedResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> SharedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("ALLOCATOR_TOTAL_BUDGET") {
            let amount: f64 = raw.trim().parse().map_err(|_| SharedError::InvalidConfig {
                field: "ALLOCATOR_TOTAL_BUDGET".to_string(),
                value: raw.clone(),
            })?;
            config.total_budget = clamp_amount(amount);
        }

        if let Some(raw) = lookup("ALLOCATOR_MODE") {
            config.mode = raw.parse()?;
        }

        if let Some(raw) = lookup("ALLOCATOR_ENGINES") {
            config.engines = EngineConfig::parse_list(&raw)?;
        }

        config.projection = ProjectionConfig::from_lookup(&lookup)?;
        Ok(config)
    }
}
