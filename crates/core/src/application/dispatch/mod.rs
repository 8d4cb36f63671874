// Dispatch Pool - Bounded queue + fixed worker set + lifecycle control

pub mod constants;
mod shutdown;
mod worker;

use constants::*;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::domain::EmailJob;
use crate::error::{DispatchError, Result};
use crate::port::{FailureSink, MailSender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use worker::Worker;

/// Pool sizing and timing. Zero values are corrected silently to the
/// documented defaults rather than rejected.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub send_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

impl DispatchConfig {
    /// Substitute defaults for zero values (non-fatal misconfiguration policy)
    fn normalized(mut self) -> Self {
        if self.worker_count == 0 {
            self.worker_count = DEFAULT_WORKER_COUNT;
        }
        if self.queue_capacity == 0 {
            self.queue_capacity = DEFAULT_QUEUE_CAPACITY;
        }
        if self.send_timeout.is_zero() {
            self.send_timeout = DEFAULT_SEND_TIMEOUT;
        }
        self
    }
}

/// Owns the bounded queue and the fixed worker set; the sole producer-facing
/// surface of the dispatch engine.
///
/// Lifecycle: Created -> Running (start) -> Draining -> Stopped (stop).
/// Shutdown converges from two triggers, cancelling the lifecycle token or
/// calling stop() directly, guarded so the queue is closed exactly once.
pub struct DispatchPool {
    /// Sender side of the bounded queue. Taken (dropped) exactly once by the
    /// winning stop() caller; None means the queue is closed for writes.
    tx: Mutex<Option<mpsc::Sender<EmailJob>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    shutdown_started: AtomicBool,
    done_tx: watch::Sender<bool>,
    done_rx: watch::Receiver<bool>,
    capacity: usize,
}

impl DispatchPool {
    /// Spawn the worker set and the supervisory task, transitioning the pool
    /// to Running. Infallible: tokio task spawn cannot fail, and zero-valued
    /// config fields fall back to defaults.
    pub fn start(
        config: DispatchConfig,
        mailer: Arc<dyn MailSender>,
        failure_sink: Arc<dyn FailureSink>,
        mut lifecycle: ShutdownToken,
    ) -> Arc<Self> {
        let config = config.normalized();

        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let queue = Arc::new(Mutex::new(rx));
        let (done_tx, done_rx) = watch::channel(false);

        let mut handles = Vec::with_capacity(config.worker_count);
        for worker_id in 0..config.worker_count {
            let worker = Worker::new(
                worker_id,
                Arc::clone(&queue),
                Arc::clone(&mailer),
                Arc::clone(&failure_sink),
                config.send_timeout,
            );
            handles.push(tokio::spawn(worker.run()));
        }

        let pool = Arc::new(Self {
            tx: Mutex::new(Some(tx)),
            workers: Mutex::new(handles),
            shutdown_started: AtomicBool::new(false),
            done_tx,
            done_rx,
            capacity: config.queue_capacity,
        });

        // Supervisory task: lifecycle cancellation converges on the same
        // stop() path as an explicit call.
        let supervised = Arc::clone(&pool);
        tokio::spawn(async move {
            lifecycle.wait().await;
            info!("lifecycle cancelled, stopping dispatch pool");
            supervised.stop().await;
        });

        info!(
            workers = config.worker_count,
            queue_capacity = config.queue_capacity,
            send_timeout_ms = config.send_timeout.as_millis() as u64,
            "dispatch pool started"
        );
        pool
    }

    /// Hand one job to the queue. Suspends the caller while the queue is at
    /// capacity (back-pressure); returns QueueClosed once shutdown has begun.
    ///
    /// Fire-and-forget: no delivery result ever reaches the producer.
    pub async fn enqueue(&self, job: EmailJob) -> Result<()> {
        // Clone the sender out of the lock so a full queue suspends only this
        // producer, not every caller of the pool.
        let tx = match self.tx.lock().await.as_ref() {
            Some(tx) => tx.clone(),
            None => return Err(DispatchError::QueueClosed),
        };

        let recipient = job.to.clone();
        let issue_id = job.issue_id.clone();

        // If stop() takes the pool's sender while we are suspended here, this
        // clone keeps the channel open until the send completes, so the job
        // is still drained by the workers.
        tx.send(job).await.map_err(|_| DispatchError::QueueClosed)?;

        debug!(recipient = %recipient, issue_id = %issue_id, "email job accepted");
        Ok(())
    }

    /// Close the queue for writes and block until every worker has drained
    /// and exited. Safe to call from multiple paths concurrently: the first
    /// caller performs the drain, every other caller waits for it to finish.
    pub async fn stop(&self) {
        if self.shutdown_started.swap(true, Ordering::SeqCst) {
            // Lost the race; wait for the winning caller to finish draining.
            let mut done = self.done_rx.clone();
            let _ = done.wait_for(|stopped| *stopped).await;
            return;
        }

        let depth = self.queue_depth_inner().await;
        info!(queue_depth = depth, "dispatch pool draining");

        // Dropping the sender closes the queue for writes; workers keep
        // receiving buffered jobs until recv() returns None.
        self.tx.lock().await.take();

        let handles = std::mem::take(&mut *self.workers.lock().await);
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "worker task join failed");
            }
        }

        let _ = self.done_tx.send(true);
        info!("dispatch pool stopped");
    }

    /// True once either shutdown trigger has fired
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_started.load(Ordering::SeqCst)
    }

    /// Jobs currently resident in the queue (0 once the queue is closed)
    pub async fn queue_depth(&self) -> usize {
        self.queue_depth_inner().await
    }

    async fn queue_depth_inner(&self) -> usize {
        match self.tx.lock().await.as_ref() {
            Some(tx) => self.capacity - tx.capacity(),
            None => 0,
        }
    }
}
