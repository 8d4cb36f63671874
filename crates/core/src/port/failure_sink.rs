// Failure Sink Port
// Extension point for permanently failed delivery attempts

use crate::domain::EmailJob;
use crate::error::DispatchError;
use async_trait::async_trait;
use tracing::error;

/// Invoked once per job whose delivery attempt failed terminally (transport
/// error or per-job timeout). The engine never retries and never requeues;
/// whatever the sink does with the job is the end of its life. A retry or
/// dead-letter store would plug in here without touching the queue/pool core.
#[async_trait]
pub trait FailureSink: Send + Sync {
    async fn discarded(&self, job: &EmailJob, error: &DispatchError);
}

/// Default sink: log and drop, preserving the engine's fire-and-forget
/// failure mode.
pub struct LogFailureSink;

#[async_trait]
impl FailureSink for LogFailureSink {
    async fn discarded(&self, job: &EmailJob, error: &DispatchError) {
        error!(
            recipient = %job.to,
            issue_id = %job.issue_id,
            error = %error,
            "email job discarded"
        );
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every discarded job for later assertions
    #[derive(Default)]
    pub struct CollectingFailureSink {
        records: Arc<Mutex<Vec<(EmailJob, String)>>>,
    }

    impl CollectingFailureSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn discarded_jobs(&self) -> Vec<(EmailJob, String)> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FailureSink for CollectingFailureSink {
        async fn discarded(&self, job: &EmailJob, error: &DispatchError) {
            self.records
                .lock()
                .unwrap()
                .push((job.clone(), error.to_string()));
        }
    }
}
