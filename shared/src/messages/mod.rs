//! Message types exchanged with the allocator
//!
//! - `config`: seed records and configuration read at startup
//! - `snapshot`: read-only views handed to the rendering layer after each mutation

pub mod config;
pub mod snapshot;

pub use config::{ensure_unique_ids, EngineConfig, CampaignConfig, ProjectionConfig};

pub use snapshot::{EngineSnapshot, AllocationSnapshot, CampaignSummary};
