//! Shared types for the retail-media budget allocator
//!
//! Contains the identifiers, seed records and snapshot messages that travel
//! between the allocator core and whatever rendering layer consumes it.
//! Allocation logic itself lives in the `allocator` crate.

pub mod types;
pub mod errors;
pub mod logging;
pub mod messages;

pub use types::*;
pub use errors::*;

pub use messages::{
    // Seed records and configuration
    EngineConfig, CampaignConfig, ProjectionConfig, ensure_unique_ids,

    // Allocator → rendering layer snapshots
    EngineSnapshot, AllocationSnapshot, CampaignSummary,
};
