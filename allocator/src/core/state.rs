//! Campaign allocation state
//!
//! Owns the engine list, the total budget and the mode, and keeps engine
//! budgets consistent with them. Every mutator runs the redistribution pass
//! synchronously before returning, so callers never observe a half-updated
//! state:
//!
//! - auto/even: budgets always sum to the total
//! - manual: budgets are user-set; `set_total_budget` may leave the total
//!   out of step with the sum until the next `set_engine_budget`
//! - every mode: a disabled engine holds 0

use shared::{clamp_amount, ensure_unique_ids, AllocationMode, Amount, EngineConfig, SharedError};

use super::distribution::{redistribute, Distribution};
use super::engine::Engine;
use crate::error::{AllocatorError, AllocatorResult};

/// Allocation state for one campaign configuration view
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationState {
    total_budget: Amount,
    mode: AllocationMode,
    engines: Vec<Engine>,
}

impl AllocationState {
    /// Build state from seed records
    ///
    /// In auto/even mode budgets are derived from `total_budget`. In manual
    /// mode enabled engines start from their seeded budget (0 if none) and
    /// the total is kept as given.
    pub fn new(engines: &[EngineConfig], total_budget: f64, mode: AllocationMode) -> AllocatorResult<Self> {
        ensure_unique_ids(engines).map_err(|err| match err {
            SharedError::DuplicateEngineId { id } => AllocatorError::DuplicateEngine { engine_id: id },
            other => AllocatorError::from(other),
        })?;

        let mut state = Self {
            total_budget: clamp_amount(total_budget),
            mode,
            engines: engines.iter().map(Engine::from).collect(),
        };

        if mode == AllocationMode::Manual {
            for (engine, seed) in state.engines.iter_mut().zip(engines) {
                engine.set_budget(seed.budget.unwrap_or(0));
            }
        }

        state.rebalance();
        Ok(state)
    }

    pub fn total_budget(&self) -> Amount {
        self.total_budget
    }

    pub fn mode(&self) -> AllocationMode {
        self.mode
    }

    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    pub fn engine(&self, engine_id: &str) -> Option<&Engine> {
        self.engines.iter().find(|engine| engine.id().as_str() == engine_id)
    }

    /// Sum of engine budgets, saturating at `Amount::MAX`
    pub fn allocated(&self) -> Amount {
        self.engines.iter().map(Engine::budget).fold(0, Amount::saturating_add)
    }

    /// `total - allocated`, signed
    ///
    /// 0 in auto/even while any engine is enabled; with every engine disabled
    /// the whole total is unallocated.
    pub fn unallocated(&self) -> i64 {
        let allocated: u128 = self.engines.iter().map(|engine| engine.budget() as u128).sum();
        let diff = self.total_budget as i128 - allocated as i128;
        diff.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    pub fn enabled_count(&self) -> usize {
        self.engines.iter().filter(|engine| engine.enabled()).count()
    }

    /// Set the campaign total; negative input is treated as 0
    pub fn set_total_budget(&mut self, amount: f64) -> Distribution {
        self.total_budget = clamp_amount(amount);
        self.rebalance()
    }

    /// Enable or disable an engine and redistribute with the total held
    pub fn set_engine_enabled(&mut self, engine_id: &str, enabled: bool) -> AllocatorResult<Distribution> {
        let index = self.index_of(engine_id)?;

        // a disabled engine holds 0, so re-enabling under manual starts there
        self.engines[index].set_enabled(enabled);

        Ok(self.rebalance())
    }

    /// Switch mode and redistribute with the total held
    ///
    /// Switching to manual freezes the current budgets as the baseline.
    pub fn set_mode(&mut self, mode: AllocationMode) -> Distribution {
        self.mode = mode;
        self.rebalance()
    }

    /// Set one engine's budget directly (manual mode only)
    ///
    /// The total becomes the sum of all engine budgets.
    pub fn set_engine_budget(&mut self, engine_id: &str, amount: f64) -> AllocatorResult<()> {
        if self.mode != AllocationMode::Manual {
            return Err(AllocatorError::ManualModeRequired { mode: self.mode });
        }

        let index = self.index_of(engine_id)?;
        let engine = &mut self.engines[index];
        if !engine.enabled() {
            return Err(AllocatorError::EngineDisabled { engine_id: engine_id.to_string() });
        }

        engine.set_budget(clamp_amount(amount));
        self.total_budget = self.allocated();
        Ok(())
    }

    /// Append an engine and redistribute with the total held
    ///
    /// Under manual mode the new engine starts at 0.
    pub fn add_engine(&mut self, config: &EngineConfig) -> AllocatorResult<Distribution> {
        if self.engine(config.id.as_str()).is_some() {
            return Err(AllocatorError::DuplicateEngine { engine_id: config.id.to_string() });
        }

        self.engines.push(Engine::from(config));
        Ok(self.rebalance())
    }

    /// Remove an engine and redistribute its budget
    ///
    /// Under manual mode the removed budget leaves the total with it.
    pub fn remove_engine(&mut self, engine_id: &str) -> AllocatorResult<Engine> {
        let index = self.index_of(engine_id)?;
        let removed = self.engines.remove(index);

        if self.mode == AllocationMode::Manual {
            self.total_budget = self.total_budget.saturating_sub(removed.budget());
        }

        self.rebalance();
        Ok(removed)
    }

    fn index_of(&self, engine_id: &str) -> AllocatorResult<usize> {
        self.engines
            .iter()
            .position(|engine| engine.id().as_str() == engine_id)
            .ok_or_else(|| AllocatorError::unknown_engine(engine_id))
    }

    /// Re-run the redistribution pass for the current mode
    fn rebalance(&mut self) -> Distribution {
        let split = redistribute(&self.engines, self.total_budget, self.mode);
        for (engine, budget) in self.engines.iter_mut().zip(split.budgets) {
            engine.set_budget(budget);
        }
        split.distribution
    }
}
