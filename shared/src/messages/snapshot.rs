//! Read-only views of allocator state
//!
//! The rendering layer never sees the allocator's internals; after every
//! mutation it receives one of these owned snapshots and redraws from it.

use serde::{Serialize, Deserialize};
use crate::types::{AllocationMode, Amount, EngineId, SessionId};

/// One engine as shown in the media cart
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EngineSnapshot {
    pub id: EngineId,
    pub name: String,
    pub enabled: bool,
    pub base_roas: f64,
    pub budget: Amount,
    /// Budget as a percentage of the campaign total, clamped to [0, 100]
    pub share_percent: f64,
}

/// Full allocator state after a mutation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AllocationSnapshot {
    pub session_id: SessionId,
    pub mode: AllocationMode,
    pub total_budget: Amount,
    /// Sum of engine budgets
    pub allocated: Amount,
    /// `total_budget - allocated`; non-zero while editing in manual mode or
    /// when every engine is disabled
    pub unallocated: i64,
    pub engines: Vec<EngineSnapshot>,
    pub blended_roas: f64,
    pub projected_sales: f64,
    pub projected_reach: f64,
}

impl AllocationSnapshot {
    pub fn engine(&self, id: &str) -> Option<&EngineSnapshot> {
        self.engines.iter().find(|engine| engine.id.as_str() == id)
    }

    pub fn enabled_engines(&self) -> impl Iterator<Item = &EngineSnapshot> {
        self.engines.iter().filter(|engine| engine.enabled)
    }
}

/// Headline figures for the campaign summary card
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CampaignSummary {
    pub mode: AllocationMode,
    pub total_budget: Amount,
    pub blended_roas: f64,
    pub projected_sales: f64,
    pub projected_reach: f64,
    pub enabled_engines: usize,
    /// Highest base ROAS among enabled engines with budget
    pub top_engine: Option<EngineId>,
}
