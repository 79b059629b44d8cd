pub mod config;
pub mod notify;
pub mod pool;
pub mod snapshot;

use serde::{Deserialize, Serialize};

/// Point-in-time record of a managed worker pool's internal counters,
/// normalized for shipping to a monitoring backend.
///
/// Created fresh on every capture and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStateSnapshot {
    /// Externally assigned pool identifier, unique within the registry
    pub pool_id: String,
    pub core_size: usize,
    pub maximum_size: usize,
    /// Current number of worker threads
    pub pool_size: usize,
    /// Workers currently executing a task
    pub active_size: usize,
    /// Historical high-water mark of the pool size
    pub largest_pool_size: usize,
    pub completed_task_count: u64,
    /// `active_size / maximum_size`, rounded to two decimals;
    /// [`LOAD_NOT_AVAILABLE`](crate::snapshot::LOAD_NOT_AVAILABLE) when the
    /// pool reports a maximum size of zero
    pub current_load: f64,
    /// `largest_pool_size / maximum_size`, same rounding and sentinel
    pub peak_load: f64,
    /// Descriptive name of the backing task queue
    pub queue_type: String,
    pub queue_size: usize,
    pub queue_remaining_capacity: usize,
    /// Always recomputed as `queue_size + queue_remaining_capacity`
    pub queue_capacity: usize,
    /// [`REJECT_COUNT_UNTRACKED`](crate::snapshot::REJECT_COUNT_UNTRACKED)
    /// when the pool does not count rejections
    pub reject_count: i64,
    /// Cluster/instance identity, normally filled in by a
    /// [`Supplement`](crate::snapshot::Supplement) step
    pub identify: Option<String>,
    /// Formatted capture time
    pub captured_at: String,
    /// Capture time as epoch milliseconds
    pub timestamp: i64,
}
