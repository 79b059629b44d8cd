//! Capture of normalized point-in-time snapshots from live pool counters.

use std::fmt;

use chrono::Utc;
use tracing::{instrument, trace};

use crate::PoolStateSnapshot;
use crate::pool::{PoolHandle, PoolLookup};

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Errors that can occur while taking a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The id does not resolve to any registered pool
    UnknownPool(String),

    /// The id resolved to an executor this crate cannot introspect
    UnsupportedPoolKind { pool_id: String, kind: String },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::UnknownPool(pool_id) => {
                write!(f, "no worker pool registered under id `{}`", pool_id)
            }
            CaptureError::UnsupportedPoolKind { pool_id, kind } => {
                write!(
                    f,
                    "pool `{}` is backed by an executor kind this crate cannot introspect: {}",
                    pool_id, kind
                )
            }
        }
    }
}

impl std::error::Error for CaptureError {}

/// Load ratio reported when the pool's maximum size is zero.
pub const LOAD_NOT_AVAILABLE: f64 = -1.0;

/// Reject count reported when the pool does not track rejections.
pub const REJECT_COUNT_UNTRACKED: i64 = -1;

/// Deployment-specific extension applied to every snapshot after the base
/// fields are filled in, e.g. to inject a cluster-wide identity.
///
/// Must be pure: no I/O, no state outside the returned snapshot.
pub trait Supplement: Send + Sync {
    fn supplement(&self, snapshot: PoolStateSnapshot) -> PoolStateSnapshot;
}

/// Identity supplement for deployments without extra fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSupplement;

impl Supplement for NoSupplement {
    fn supplement(&self, snapshot: PoolStateSnapshot) -> PoolStateSnapshot {
        snapshot
    }
}

/// Builds [`PoolStateSnapshot`]s from live pool handles.
pub struct Snapshotter {
    supplement: Box<dyn Supplement>,
}

impl Snapshotter {
    pub fn new() -> Self {
        Self::with_supplement(Box::new(NoSupplement))
    }

    /// Create a snapshotter with a deployment-specific supplement step.
    pub fn with_supplement(supplement: Box<dyn Supplement>) -> Self {
        Self { supplement }
    }

    /// Capture a snapshot of `pool` under the given id.
    ///
    /// Performs only reads against the handle and is safe to call
    /// concurrently from any number of callers.
    #[instrument(skip(self, pool))]
    pub fn capture(&self, pool_id: &str, pool: &dyn PoolHandle) -> PoolStateSnapshot {
        let maximum_size = pool.maximum_size();
        let active_size = pool.active_size();
        let largest_pool_size = pool.largest_pool_size();

        let queue_size = pool.queue_size();
        let queue_remaining_capacity = pool.queue_remaining_capacity();

        let now = Utc::now();
        let snapshot = PoolStateSnapshot {
            pool_id: pool_id.to_string(),
            core_size: pool.core_size(),
            maximum_size,
            pool_size: pool.pool_size(),
            active_size,
            largest_pool_size,
            completed_task_count: pool.completed_task_count(),
            current_load: load_ratio(active_size, maximum_size),
            peak_load: load_ratio(largest_pool_size, maximum_size),
            queue_type: pool.queue_type(),
            queue_size,
            queue_remaining_capacity,
            // never trusted from the handle
            queue_capacity: queue_size + queue_remaining_capacity,
            reject_count: pool
                .reject_count()
                .map_or(REJECT_COUNT_UNTRACKED, |count| count as i64),
            identify: None,
            captured_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            timestamp: now.timestamp_millis(),
        };
        trace!("captured snapshot for pool {pool_id}: {snapshot:?}");

        self.supplement.supplement(snapshot)
    }

    /// Resolve `pool_id` through `lookup` and capture a snapshot of the
    /// resulting handle.
    ///
    /// Lookup failures are surfaced unchanged and capture is never attempted.
    pub fn capture_by_id(
        &self,
        pool_id: &str,
        lookup: &dyn PoolLookup,
    ) -> CaptureResult<PoolStateSnapshot> {
        let pool = lookup.find(pool_id)?;
        Ok(self.capture(pool_id, pool.as_ref()))
    }
}

impl Default for Snapshotter {
    fn default() -> Self {
        Self::new()
    }
}

fn load_ratio(part: usize, max: usize) -> f64 {
    if max == 0 {
        return LOAD_NOT_AVAILABLE;
    }
    let ratio = part as f64 / max as f64;
    (ratio * 100.0).round() / 100.0
}
