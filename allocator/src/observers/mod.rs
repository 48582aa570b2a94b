//! Observer implementations
//!
//! - `LoggingObserver`: emits one debug event per snapshot
//! - `SnapshotRecorder`: keeps every snapshot for later inspection

pub mod logging;
pub mod recorder;

pub use logging::LoggingObserver;
pub use recorder::SnapshotRecorder;
