//! Test fixtures and data for allocator tests

use shared::EngineConfig;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Standard engine ids
    pub const DISPLAY: &'static str = "display";
    pub const SPONSORED: &'static str = "sponsored";
    pub const DIGITAL: &'static str = "digital";

    /// Standard campaign total
    pub const DEFAULT_BUDGET: f64 = 5000.0;

    /// The three dashboard engines: display 2.5, sponsored 4.8, digital 3.2
    pub fn dashboard_engines() -> Vec<EngineConfig> {
        vec![
            EngineConfig::new(Self::DISPLAY, "Display Ads", 2.5),
            EngineConfig::new(Self::SPONSORED, "Sponsored Products", 4.8),
            EngineConfig::new(Self::DIGITAL, "Digital In-Store", 3.2),
        ]
    }

    /// Engines whose ROAS sums to 0 (degenerate auto weighting)
    pub fn zero_roas_engines() -> Vec<EngineConfig> {
        vec![
            EngineConfig::new("a", "A", 0.0),
            EngineConfig::new("b", "B", 0.0),
            EngineConfig::new("c", "C", 0.0),
        ]
    }

    /// Every engine disabled
    pub fn disabled_engines() -> Vec<EngineConfig> {
        Self::dashboard_engines().into_iter().map(EngineConfig::disabled).collect()
    }

    /// Engines seeded with manual budgets
    pub fn manual_seed() -> Vec<EngineConfig> {
        vec![
            EngineConfig::new(Self::DISPLAY, "Display Ads", 2.5).with_budget(1000),
            EngineConfig::new(Self::SPONSORED, "Sponsored Products", 4.8).with_budget(2500),
            EngineConfig::new(Self::DIGITAL, "Digital In-Store", 3.2).with_budget(1500),
        ]
    }
}
