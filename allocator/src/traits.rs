//! Trait definitions with mockall annotations for testing
//!
//! The allocator pushes a fresh snapshot to every subscribed observer after
//! each successful mutation. The rendering layer implements this trait to
//! redraw; tests use the generated `MockAllocationObserver`.

use shared::AllocationSnapshot;

/// Receiver of allocation snapshots
///
/// Called synchronously on the mutating thread, once per successful
/// mutation, after the state is consistent. Implementations must not call
/// back into the allocator.
#[mockall::automock]
pub trait AllocationObserver: Send {
    /// Handle the state produced by the latest mutation
    fn on_change(&self, snapshot: &AllocationSnapshot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_observer_instantiation() {
        let mut observer = MockAllocationObserver::new();
        observer.expect_on_change().times(0);
        let _boxed: Box<dyn AllocationObserver> = Box::new(observer);
    }
}
