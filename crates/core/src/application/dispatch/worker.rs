// Worker - Email delivery loop

use crate::domain::EmailJob;
use crate::error::DispatchError;
use crate::port::{FailureSink, MailSender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;
use tracing::{error, info};

/// Shared receiving end of the bounded queue. Exactly N workers contend on it;
/// the lock is held only for the dequeue itself, never across a delivery.
pub(crate) type SharedQueue = Arc<Mutex<mpsc::Receiver<EmailJob>>>;

/// One worker loop: dequeue, deliver with a bounded timeout, log the outcome.
/// Holds no state beyond an identifier used for logging.
pub(crate) struct Worker {
    id: usize,
    queue: SharedQueue,
    mailer: Arc<dyn MailSender>,
    failure_sink: Arc<dyn FailureSink>,
    send_timeout: Duration,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        queue: SharedQueue,
        mailer: Arc<dyn MailSender>,
        failure_sink: Arc<dyn FailureSink>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            id,
            queue,
            mailer,
            failure_sink,
            send_timeout,
        }
    }

    /// Run until the queue is closed AND empty. Once shutdown closes the
    /// sender side, recv() keeps yielding buffered jobs before returning
    /// None, which is exactly the drain guarantee: every accepted job is
    /// handed to the mail sender before this loop exits.
    pub(crate) async fn run(self) {
        info!(worker_id = self.id, "mail worker started");
        loop {
            let job = { self.queue.lock().await.recv().await };
            match job {
                Some(job) => self.deliver(job).await,
                None => break,
            }
        }
        info!(worker_id = self.id, "mail worker drained and stopped");
    }

    /// Attempt one delivery, bounded by the per-job timeout. The timeout is
    /// rooted independently of the lifecycle token: an in-flight send may
    /// outlive shutdown by up to this duration. Failures are terminal; the
    /// job goes to the failure sink and is never requeued.
    async fn deliver(&self, job: EmailJob) {
        let started = Instant::now();
        let outcome = timeout(
            self.send_timeout,
            self.mailer.send(&job.to, &job.subject, &job.body),
        )
        .await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(())) => {
                info!(
                    worker_id = self.id,
                    recipient = %job.to,
                    issue_id = %job.issue_id,
                    duration_ms,
                    "email delivered"
                );
            }
            Ok(Err(e)) => {
                error!(
                    worker_id = self.id,
                    recipient = %job.to,
                    issue_id = %job.issue_id,
                    duration_ms,
                    error = %e,
                    "email delivery failed"
                );
                self.failure_sink
                    .discarded(&job, &DispatchError::Send(e))
                    .await;
            }
            Err(_) => {
                error!(
                    worker_id = self.id,
                    recipient = %job.to,
                    issue_id = %job.issue_id,
                    timeout_ms = self.send_timeout.as_millis() as u64,
                    "email delivery timed out"
                );
                self.failure_sink
                    .discarded(
                        &job,
                        &DispatchError::Timeout {
                            elapsed: self.send_timeout,
                        },
                    )
                    .await;
            }
        }
    }
}
