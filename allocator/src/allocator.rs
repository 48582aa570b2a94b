//! Budget allocator handle
//!
//! Wraps [`AllocationState`] with a session id, projection settings and the
//! observer list. Each mutator validates, updates the state, logs, and then
//! pushes one snapshot to every observer. A rejected mutation changes
//! nothing and notifies nobody.
//!
//! The allocator has no internal locking: one writer per session. Use
//! [`BudgetAllocator::fork`] to give another session its own copy.

use std::fmt;

use shared::{
    session_debug, session_warn, AllocationMode, AllocationSnapshot, Amount, CampaignConfig,
    CampaignSummary, EngineConfig, EngineSnapshot, ProjectionConfig, SessionId,
};

use crate::core::distribution::Distribution;
use crate::core::projection::{self, share_percent};
use crate::core::state::AllocationState;
use crate::error::{AllocatorError, AllocatorResult};
use crate::traits::AllocationObserver;

/// Stateful budget allocator for one campaign configuration session
pub struct BudgetAllocator {
    session_id: SessionId,
    state: AllocationState,
    projection: ProjectionConfig,
    observers: Vec<Box<dyn AllocationObserver>>,
}

impl BudgetAllocator {
    /// Create an allocator from seed engines, a total budget and a mode
    ///
    /// A negative total is treated as 0. Duplicate engine ids are rejected.
    pub fn new(engines: &[EngineConfig], total_budget: f64, mode: AllocationMode) -> AllocatorResult<Self> {
        let state = AllocationState::new(engines, total_budget, mode)?;
        let session_id = SessionId::new();

        session_debug!(
            session_id,
            "Allocator created: {} engines, total {}, mode {}",
            state.engines().len(),
            state.total_budget(),
            mode
        );

        Ok(Self {
            session_id,
            state,
            projection: ProjectionConfig::default(),
            observers: Vec::new(),
        })
    }

    /// Create an allocator from a full campaign configuration
    pub fn from_config(config: &CampaignConfig) -> AllocatorResult<Self> {
        Ok(Self::new(&config.engines, config.total_budget as f64, config.mode)?
            .with_projection(config.projection.clone()))
    }

    pub fn with_projection(mut self, projection: ProjectionConfig) -> Self {
        self.projection = projection;
        self
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn state(&self) -> &AllocationState {
        &self.state
    }

    /// Copy the allocation into a new session without observers
    pub fn fork(&self) -> Self {
        Self {
            session_id: SessionId::new(),
            state: self.state.clone(),
            projection: self.projection.clone(),
            observers: Vec::new(),
        }
    }

    /// Register an observer for every subsequent mutation
    pub fn subscribe(&mut self, observer: Box<dyn AllocationObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ---- mutators ----

    /// Set the campaign total and redistribute under the current mode
    pub fn set_total_budget(&mut self, amount: f64) {
        if amount < 0.0 {
            session_debug!(self.session_id, "Negative total {} clamped to 0", amount);
        }
        let distribution = self.state.set_total_budget(amount);
        if !self.state.mode().redistributes() {
            session_debug!(
                self.session_id,
                "Manual total set to {}, {} left unallocated",
                self.state.total_budget(),
                self.state.unallocated()
            );
        }
        self.commit("set_total_budget", Some(distribution));
    }

    /// Enable or disable an engine, holding the total constant
    pub fn set_engine_enabled(&mut self, engine_id: &str, enabled: bool) -> AllocatorResult<()> {
        let distribution = self
            .state
            .set_engine_enabled(engine_id, enabled)
            .map_err(|e| self.rejected("set_engine_enabled", e))?;
        self.commit("set_engine_enabled", Some(distribution));
        Ok(())
    }

    /// Switch allocation mode, holding the total constant
    ///
    /// Calling this twice with the same mode yields the same budgets.
    pub fn set_mode(&mut self, mode: AllocationMode) {
        let distribution = self.state.set_mode(mode);
        self.commit("set_mode", Some(distribution));
    }

    /// Set one engine's budget; only valid in manual mode
    ///
    /// Fails with [`AllocatorError::ManualModeRequired`] in auto/even mode
    /// and [`AllocatorError::EngineDisabled`] for a disabled engine.
    pub fn set_engine_budget(&mut self, engine_id: &str, amount: f64) -> AllocatorResult<()> {
        self.state
            .set_engine_budget(engine_id, amount)
            .map_err(|e| self.rejected("set_engine_budget", e))?;
        self.commit("set_engine_budget", None);
        Ok(())
    }

    /// Add an engine to the campaign
    pub fn add_engine(&mut self, config: EngineConfig) -> AllocatorResult<()> {
        let distribution = self
            .state
            .add_engine(&config)
            .map_err(|e| self.rejected("add_engine", e))?;
        self.commit("add_engine", Some(distribution));
        Ok(())
    }

    /// Remove an engine, returning its last snapshot
    pub fn remove_engine(&mut self, engine_id: &str) -> AllocatorResult<EngineSnapshot> {
        let total_before = self.state.total_budget();
        let removed = self
            .state
            .remove_engine(engine_id)
            .map_err(|e| self.rejected("remove_engine", e))?;
        self.commit("remove_engine", None);
        Ok(removed.snapshot(total_before))
    }

    // ---- queries ----

    pub fn mode(&self) -> AllocationMode {
        self.state.mode()
    }

    pub fn total_budget(&self) -> Amount {
        self.state.total_budget()
    }

    pub fn allocated(&self) -> Amount {
        self.state.allocated()
    }

    pub fn unallocated(&self) -> i64 {
        self.state.unallocated()
    }

    /// Owned snapshot of every engine, in insertion order
    pub fn get_engines(&self) -> Vec<EngineSnapshot> {
        let total = self.state.total_budget();
        self.state.engines().iter().map(|engine| engine.snapshot(total)).collect()
    }

    pub fn engine(&self, engine_id: &str) -> Option<EngineSnapshot> {
        self.state
            .engine(engine_id)
            .map(|engine| engine.snapshot(self.state.total_budget()))
    }

    /// Engine budget as a percentage of the total, clamped to [0, 100]
    pub fn share_percent(&self, engine_id: &str) -> AllocatorResult<f64> {
        self.state
            .engine(engine_id)
            .map(|engine| share_percent(engine.budget(), self.state.total_budget()))
            .ok_or_else(|| AllocatorError::unknown_engine(engine_id))
    }

    pub fn blended_roas(&self) -> f64 {
        projection::blended_roas(self.state.engines())
    }

    pub fn projected_sales(&self) -> f64 {
        projection::projected_sales(self.state.total_budget(), self.blended_roas())
    }

    pub fn projected_reach(&self) -> f64 {
        projection::projected_reach(self.state.total_budget(), self.state.enabled_count(), &self.projection)
    }

    /// Full read-only view for the rendering layer
    pub fn snapshot(&self) -> AllocationSnapshot {
        AllocationSnapshot {
            session_id: self.session_id,
            mode: self.state.mode(),
            total_budget: self.state.total_budget(),
            allocated: self.state.allocated(),
            unallocated: self.state.unallocated(),
            engines: self.get_engines(),
            blended_roas: self.blended_roas(),
            projected_sales: self.projected_sales(),
            projected_reach: self.projected_reach(),
        }
    }

    /// Headline figures for the campaign summary card
    pub fn summary(&self) -> CampaignSummary {
        CampaignSummary {
            mode: self.state.mode(),
            total_budget: self.state.total_budget(),
            blended_roas: self.blended_roas(),
            projected_sales: self.projected_sales(),
            projected_reach: self.projected_reach(),
            enabled_engines: self.state.enabled_count(),
            top_engine: projection::top_engine(self.state.engines()).cloned(),
        }
    }

    /// Snapshot serialized as pretty JSON
    pub fn to_json(&self) -> AllocatorResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    fn rejected(&self, action: &str, error: AllocatorError) -> AllocatorError {
        session_warn!(self.session_id, "⚠️ {} rejected: {}", action, error);
        error
    }

    fn commit(&self, action: &str, distribution: Option<Distribution>) {
        if distribution == Some(Distribution::EvenFallback) {
            session_debug!(self.session_id, "Enabled engines have no ROAS, splitting evenly");
        }

        session_debug!(
            self.session_id,
            "{}: mode {}, total {}, allocated {}",
            action,
            self.state.mode(),
            self.state.total_budget(),
            self.state.allocated()
        );

        if self.observers.is_empty() {
            return;
        }

        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer.on_change(&snapshot);
        }
    }
}

impl fmt::Debug for BudgetAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BudgetAllocator")
            .field("session_id", &self.session_id)
            .field("state", &self.state)
            .field("projection", &self.projection)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockAllocationObserver;
    use mockall::predicate::function;

    fn dashboard() -> BudgetAllocator {
        BudgetAllocator::new(&EngineConfig::retail_media_defaults(), 5000.0, AllocationMode::Auto).unwrap()
    }

    #[test]
    fn test_observer_notified_once_per_mutation() {
        let mut allocator = dashboard();
        let mut observer = MockAllocationObserver::new();
        observer
            .expect_on_change()
            .with(function(|snapshot: &AllocationSnapshot| snapshot.total_budget == 8000))
            .times(1)
            .return_const(());
        allocator.subscribe(Box::new(observer));

        allocator.set_total_budget(8000.0);
    }

    #[test]
    fn test_rejected_mutation_does_not_notify() {
        let mut allocator = dashboard();
        let mut observer = MockAllocationObserver::new();
        observer.expect_on_change().times(0);
        allocator.subscribe(Box::new(observer));

        assert!(allocator.set_engine_budget("display", 100.0).is_err());
        assert!(allocator.set_engine_enabled("radio", true).is_err());
        assert!(allocator.remove_engine("radio").is_err());
    }

    #[test]
    fn test_fork_gets_new_session() {
        let mut allocator = dashboard();
        allocator.subscribe(Box::new(MockAllocationObserver::new()));

        let fork = allocator.fork();
        assert_ne!(fork.session_id(), allocator.session_id());
        assert_eq!(fork.state(), allocator.state());
        assert_eq!(fork.observer_count(), 0);
    }

    #[test]
    fn test_summary() {
        let allocator = dashboard();
        let summary = allocator.summary();
        assert_eq!(summary.enabled_engines, 3);
        assert_eq!(summary.top_engine.as_ref().map(|id| id.as_str()), Some("sponsored"));
        assert_eq!(summary.projected_sales, allocator.projected_sales());
    }

    #[test]
    fn test_snapshot_json() {
        let json = dashboard().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "auto");
        assert_eq!(value["total_budget"], 5000);
        assert_eq!(value["engines"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_remove_engine_returns_last_snapshot() {
        let mut allocator = dashboard();
        let removed = allocator.remove_engine("digital").unwrap();
        assert_eq!(removed.budget, 1524);
        assert!(allocator.engine("digital").is_none());
        assert_eq!(allocator.allocated(), 5000);
    }
}
