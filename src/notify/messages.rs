//! Alert payload types shared by all channel handlers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PoolStateSnapshot;

/// What tripped the alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// Queue usage crossed the capacity threshold
    Capacity,
    /// Active-worker ratio crossed the liveness threshold
    Activity,
    /// A task exceeded its execution timeout
    Timeout,
    /// A task was rejected by the pool
    Reject,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertKind::Capacity => "CAPACITY",
            AlertKind::Activity => "ACTIVITY",
            AlertKind::Timeout => "TIMEOUT",
            AlertKind::Reject => "REJECT",
        };
        write!(f, "{label}")
    }
}

/// Threshold-breach alarm payload, built from a snapshot plus caller context.
///
/// Immutable once constructed; one instance per alarm event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateAlert {
    pub kind: AlertKind,

    /// Active environment label (e.g. "PROD")
    pub active: String,
    pub pool_id: String,
    pub app_name: String,

    /// Cluster/instance identity
    pub identify: String,

    pub core_size: usize,
    pub maximum_size: usize,
    pub pool_size: usize,
    pub active_size: usize,
    pub largest_pool_size: usize,
    pub completed_task_count: u64,
    pub queue_type: String,
    pub queue_capacity: usize,
    pub queue_size: usize,
    pub queue_remaining_capacity: usize,

    /// Name of the pool's rejection policy
    pub rejected_handler_name: String,
    pub reject_count: i64,

    /// Milliseconds the offending task ran; Timeout alarms only
    pub execute_time: Option<u64>,
    /// Configured execution timeout in milliseconds; Timeout alarms only
    pub execute_timeout: Option<u64>,
    /// Trace of the offending task, when the runtime recorded one
    pub execute_timeout_trace: Option<String>,
}

impl StateAlert {
    /// Seed an alarm from a snapshot. Environment fields (`active`,
    /// `app_name`, `rejected_handler_name`) start empty and timeout details
    /// start unset; the caller fills in what it knows.
    pub fn from_snapshot(kind: AlertKind, snapshot: &PoolStateSnapshot) -> Self {
        Self {
            kind,
            active: String::new(),
            pool_id: snapshot.pool_id.clone(),
            app_name: String::new(),
            identify: snapshot.identify.clone().unwrap_or_default(),
            core_size: snapshot.core_size,
            maximum_size: snapshot.maximum_size,
            pool_size: snapshot.pool_size,
            active_size: snapshot.active_size,
            largest_pool_size: snapshot.largest_pool_size,
            completed_task_count: snapshot.completed_task_count,
            queue_type: snapshot.queue_type.clone(),
            queue_capacity: snapshot.queue_capacity,
            queue_size: snapshot.queue_size,
            queue_remaining_capacity: snapshot.queue_remaining_capacity,
            rejected_handler_name: String::new(),
            reject_count: snapshot.reject_count,
            execute_time: None,
            execute_timeout: None,
            execute_timeout_trace: None,
        }
    }
}

/// Before/after pair for one mutable pool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta<T> {
    pub before: T,
    pub after: T,
}

impl<T> Delta<T> {
    pub fn new(before: T, after: T) -> Self {
        Self { before, after }
    }
}

impl<T: fmt::Display> fmt::Display for Delta<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.before, self.after)
    }
}

/// Parameter-change notice payload.
///
/// Immutable once constructed; one instance per configuration change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeAlert {
    /// Active environment label (e.g. "PROD")
    pub active: String,
    pub pool_id: String,
    pub app_name: String,

    /// Cluster/instance identity
    pub identify: String,

    pub core_size: Delta<usize>,
    pub maximum_size: Delta<usize>,
    pub allow_core_thread_timeout: Delta<bool>,
    pub keep_alive_seconds: Delta<u64>,
    pub execute_timeout_millis: Delta<u64>,
    pub queue_type: String,
    pub queue_capacity: Delta<usize>,
    pub rejected_handler_name: Delta<String>,
}
