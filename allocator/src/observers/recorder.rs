//! Observer that records snapshots in memory

use std::sync::{Arc, Mutex};

use shared::AllocationSnapshot;

use crate::traits::AllocationObserver;

/// Collects every snapshot it is handed
///
/// Clones share the same buffer, so one clone can be subscribed while the
/// caller keeps another to read the history.
#[derive(Debug, Default, Clone)]
pub struct SnapshotRecorder {
    snapshots: Arc<Mutex<Vec<AllocationSnapshot>>>,
}

impl SnapshotRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn latest(&self) -> Option<AllocationSnapshot> {
        self.lock().last().cloned()
    }

    pub fn history(&self) -> Vec<AllocationSnapshot> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AllocationSnapshot>> {
        self.snapshots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AllocationObserver for SnapshotRecorder {
    fn on_change(&self, snapshot: &AllocationSnapshot) {
        self.lock().push(snapshot.clone());
    }
}
