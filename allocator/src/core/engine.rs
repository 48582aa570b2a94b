//! Engine records owned by the allocation state

use shared::{clamp_roas, Amount, EngineConfig, EngineId, EngineSnapshot};

use super::projection::share_percent;

/// One advertising engine inside an allocation
///
/// `budget` is derived state: only the allocation state writes it, and a
/// disabled engine always holds 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    id: EngineId,
    name: String,
    enabled: bool,
    base_roas: f64,
    budget: Amount,
}

impl Engine {
    pub fn new(id: impl Into<EngineId>, name: impl Into<String>, base_roas: f64, enabled: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled,
            base_roas: clamp_roas(base_roas),
            budget: 0,
        }
    }

    pub fn id(&self) -> &EngineId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn base_roas(&self) -> f64 {
        self.base_roas
    }

    pub fn budget(&self) -> Amount {
        self.budget
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.budget = 0;
        }
    }

    pub(crate) fn set_budget(&mut self, budget: Amount) {
        self.budget = if self.enabled { budget } else { 0 };
    }

    pub fn snapshot(&self, total_budget: Amount) -> EngineSnapshot {
        EngineSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            enabled: self.enabled,
            base_roas: self.base_roas,
            budget: self.budget,
            share_percent: share_percent(self.budget, total_budget),
        }
    }
}

impl From<&EngineConfig> for Engine {
    fn from(config: &EngineConfig) -> Self {
        Engine::new(config.id.clone(), config.name.clone(), config.base_roas, config.enabled)
    }
}
