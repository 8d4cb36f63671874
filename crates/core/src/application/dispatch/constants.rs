// Dispatch constants (no magic values)
use std::time::Duration;

/// Worker count substituted when the caller supplies zero
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Queue capacity substituted when the caller supplies zero
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Per-job send timeout, independent of the lifecycle token (30s)
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);
