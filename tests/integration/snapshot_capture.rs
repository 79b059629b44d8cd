//! End-to-end capture tests: lookup resolution, error surfacing, snapshot
//! invariants under concurrent and repeated capture.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use assert_matches::assert_matches;
use poolguard::pool::{PoolHandle, PoolLookup};
use poolguard::snapshot::{CaptureError, CaptureResult, Snapshotter};
use pretty_assertions::assert_eq;

use crate::helpers::*;

/// A pool registry in the host application's style: it stores arbitrary
/// executors and only some of them are introspectable worker pools.
#[derive(Default)]
struct HostPoolRegistry {
    executors: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl HostPoolRegistry {
    fn insert(&mut self, pool_id: &str, executor: Arc<dyn Any + Send + Sync>) {
        self.executors.insert(pool_id.to_string(), executor);
    }
}

impl PoolLookup for HostPoolRegistry {
    fn find(&self, pool_id: &str) -> CaptureResult<Arc<dyn PoolHandle>> {
        let executor = self
            .executors
            .get(pool_id)
            .ok_or_else(|| CaptureError::UnknownPool(pool_id.to_string()))?;

        executor
            .clone()
            .downcast::<TestPool>()
            .map(|pool| pool as Arc<dyn PoolHandle>)
            .map_err(|_| CaptureError::UnsupportedPoolKind {
                pool_id: pool_id.to_string(),
                kind: String::from("opaque executor"),
            })
    }
}

#[test]
fn capture_by_id_resolves_through_lookup() {
    let mut registry = HostPoolRegistry::default();
    registry.insert("pool-a", Arc::new(TestPool::sample()));
    let snapshotter = Snapshotter::new();

    let snapshot = snapshotter.capture_by_id("pool-a", &registry).unwrap();

    assert_eq!(snapshot.pool_id, "pool-a");
    assert_eq!(snapshot.current_load, 0.80);
    assert_eq!(snapshot.peak_load, 0.90);
    assert_eq!(snapshot.queue_capacity, 10);
}

#[test]
fn capture_by_id_surfaces_unknown_pool() {
    let registry = HostPoolRegistry::default();
    let snapshotter = Snapshotter::new();

    let result = snapshotter.capture_by_id("missing", &registry);

    assert_matches!(result, Err(CaptureError::UnknownPool(id)) if id == "missing");
}

#[test]
fn capture_by_id_surfaces_unsupported_executor_kind() {
    let mut registry = HostPoolRegistry::default();
    // not a worker pool at all
    registry.insert("job-runner", Arc::new(String::from("cron executor")));
    let snapshotter = Snapshotter::new();

    let result = snapshotter.capture_by_id("job-runner", &registry);

    assert_matches!(
        result,
        Err(CaptureError::UnsupportedPoolKind { pool_id, .. }) if pool_id == "job-runner"
    );
}

#[test]
fn completed_count_is_non_decreasing_across_captures() {
    let pool = TestPool::sample();
    let snapshotter = Snapshotter::new();

    let first = snapshotter.capture("pool-a", &pool);
    pool.completed_task_count.fetch_add(40, Ordering::Relaxed);
    let second = snapshotter.capture("pool-a", &pool);

    assert!(second.completed_task_count >= first.completed_task_count);
    assert_eq!(second.completed_task_count, 160);
}

#[tokio::test]
async fn concurrent_captures_of_one_pool_all_hold_invariants() {
    let pool = Arc::new(TestPool::sample());
    let snapshotter = Arc::new(Snapshotter::new());

    let mut handles = Vec::new();
    for worker in 0..16 {
        let pool = pool.clone();
        let snapshotter = snapshotter.clone();
        handles.push(tokio::spawn(async move {
            // mutate the shared counters while other tasks capture
            pool.active_size.store(worker % 11, Ordering::Relaxed);
            pool.completed_task_count.fetch_add(1, Ordering::Relaxed);
            snapshotter.capture("pool-a", pool.as_ref())
        }));
    }

    for handle in handles {
        let snapshot = handle.await.unwrap();
        assert_eq!(
            snapshot.queue_capacity,
            snapshot.queue_size + snapshot.queue_remaining_capacity
        );
        assert!(snapshot.current_load >= 0.0 && snapshot.current_load <= 1.0);
        assert!(snapshot.peak_load >= 0.0 && snapshot.peak_load <= 1.0);
    }
}
