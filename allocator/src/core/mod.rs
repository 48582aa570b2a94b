//! Core business logic modules
//!
//! This module contains pure allocation logic with no I/O dependencies.
//! All functions are deterministic and easily testable.

pub mod availability;
pub mod distribution;
pub mod engine;
pub mod projection;
pub mod state;

pub use availability::{classify, classify_row, Availability, Band, BandSummary};
pub use distribution::{redistribute, Distribution, Split};
pub use engine::Engine;
pub use state::AllocationState;
