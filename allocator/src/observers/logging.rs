//! Observer that traces every snapshot

use shared::{session_debug, AllocationSnapshot};

use crate::traits::AllocationObserver;

/// Logs the headline numbers of each snapshot at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl LoggingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl AllocationObserver for LoggingObserver {
    fn on_change(&self, snapshot: &AllocationSnapshot) {
        session_debug!(
            snapshot.session_id,
            mode = %snapshot.mode,
            total = snapshot.total_budget,
            allocated = snapshot.allocated,
            "📋 Allocation updated: blended ROAS {:.2}, projected sales {:.0}",
            snapshot.blended_roas,
            snapshot.projected_sales
        );
    }
}
