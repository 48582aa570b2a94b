//! Budget allocation core for the retail media campaign dashboard
//!
//! Splits a campaign budget across advertising engines (ROAS-weighted,
//! even, or manual), derives the blended ROAS and projected sales and
//! reach, and classifies calendar availability cells. Rendering layers
//! subscribe to snapshots through [`AllocationObserver`].

pub mod allocator;
pub mod core;
pub mod error;
pub mod observers;
pub mod traits;

// Re-export commonly used types
pub use allocator::BudgetAllocator;
pub use crate::core::{classify, classify_row, AllocationState, Availability, Band, BandSummary, Distribution};
pub use error::{AllocatorError, AllocatorResult};
pub use observers::{LoggingObserver, SnapshotRecorder};
pub use traits::{AllocationObserver, MockAllocationObserver};
