//! Test helpers and builder patterns for allocator tests

use allocator::{AllocationObserver, BudgetAllocator, MockAllocationObserver, SnapshotRecorder};
use shared::{AllocationMode, Amount, EngineConfig, ProjectionConfig};

use super::fixtures::TestFixtures;

/// Builder for test allocators with sensible defaults
pub struct AllocatorBuilder {
    engines: Vec<EngineConfig>,
    total_budget: f64,
    mode: AllocationMode,
    projection: ProjectionConfig,
    observers: Vec<Box<dyn AllocationObserver>>,
}

impl AllocatorBuilder {
    pub fn new() -> Self {
        Self {
            engines: TestFixtures::dashboard_engines(),
            total_budget: TestFixtures::DEFAULT_BUDGET,
            mode: AllocationMode::Auto,
            projection: ProjectionConfig::default(),
            observers: Vec::new(),
        }
    }

    pub fn with_engines(mut self, engines: Vec<EngineConfig>) -> Self {
        self.engines = engines;
        self
    }

    pub fn with_budget(mut self, total_budget: f64) -> Self {
        self.total_budget = total_budget;
        self
    }

    pub fn with_mode(mut self, mode: AllocationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_projection(mut self, projection: ProjectionConfig) -> Self {
        self.projection = projection;
        self
    }

    /// Configure an observer mock with a setup function
    pub fn with_observer<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockAllocationObserver),
    {
        let mut observer = MockAllocationObserver::new();
        setup(&mut observer);
        self.observers.push(Box::new(observer));
        self
    }

    pub fn with_recorder(mut self, recorder: &SnapshotRecorder) -> Self {
        self.observers.push(Box::new(recorder.clone()));
        self
    }

    pub fn build(self) -> BudgetAllocator {
        let mut allocator = BudgetAllocator::new(&self.engines, self.total_budget, self.mode)
            .expect("test engines must have unique ids")
            .with_projection(self.projection);
        for observer in self.observers {
            allocator.subscribe(observer);
        }
        allocator
    }
}

/// Assertion and lookup helpers
pub struct TestHelpers;

impl TestHelpers {
    /// Dashboard engines, 5000 total, auto mode
    pub fn dashboard() -> BudgetAllocator {
        AllocatorBuilder::new().build()
    }

    pub fn budget(allocator: &BudgetAllocator, engine_id: &str) -> Amount {
        allocator
            .engine(engine_id)
            .unwrap_or_else(|| panic!("engine {engine_id} should exist"))
            .budget
    }

    pub fn budgets(allocator: &BudgetAllocator) -> Vec<Amount> {
        allocator.get_engines().iter().map(|engine| engine.budget).collect()
    }

    /// Budgets sum to the total
    pub fn assert_balanced(allocator: &BudgetAllocator) {
        let sum: Amount = Self::budgets(allocator).iter().sum();
        assert_eq!(sum, allocator.total_budget(), "budgets {:?} should sum to the total", Self::budgets(allocator));
        assert_eq!(allocator.unallocated(), 0);
    }

    /// Every disabled engine holds 0
    pub fn assert_disabled_zero(allocator: &BudgetAllocator) {
        for engine in allocator.get_engines() {
            if !engine.enabled {
                assert_eq!(engine.budget, 0, "disabled engine {} holds budget", engine.id);
            }
        }
    }

    /// Float comparison with an absolute tolerance
    pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }
}
