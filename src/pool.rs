//! Capability traits over the live worker pools this crate introspects.

use std::sync::Arc;

use crate::snapshot::CaptureResult;

/// Read-only view of a live worker pool's counters.
///
/// All methods are reads; implementations are expected to back them with
/// concurrency-safe counters so many callers can snapshot the same pool at
/// once. The snapshot side performs no locking of its own.
pub trait PoolHandle: Send + Sync {
    fn core_size(&self) -> usize;
    fn maximum_size(&self) -> usize;
    fn pool_size(&self) -> usize;
    fn active_size(&self) -> usize;
    fn largest_pool_size(&self) -> usize;
    fn completed_task_count(&self) -> u64;
    /// Descriptive name of the backing task queue.
    fn queue_type(&self) -> String;
    fn queue_size(&self) -> usize;
    fn queue_remaining_capacity(&self) -> usize;
    /// Rejection counter, if the pool tracks one.
    fn reject_count(&self) -> Option<u64> {
        None
    }
}

/// Resolves an opaque pool id to a live handle.
///
/// Implemented by the surrounding application's pool registry; this crate
/// only consumes it. Registries that can hold executors this crate cannot
/// introspect report
/// [`CaptureError::UnsupportedPoolKind`](crate::snapshot::CaptureError).
pub trait PoolLookup: Send + Sync {
    fn find(&self, pool_id: &str) -> CaptureResult<Arc<dyn PoolHandle>>;
}
