//! Dispatch pool lifecycle integration tests
//!
//! Exercises the full Created -> Running -> Draining -> Stopped path through
//! the public crate surface, with both shutdown triggers.

use std::sync::Arc;
use std::time::Duration;

use mailcast_core::application::{shutdown_channel, DispatchConfig, DispatchPool};
use mailcast_core::domain::EmailJob;
use mailcast_core::error::DispatchError;
use mailcast_core::port::failure_sink::LogFailureSink;
use mailcast_core::port::mail_sender::mocks::MockMailSender;

fn job(n: usize) -> EmailJob {
    EmailJob::new(
        format!("subscriber{}@example.com", n),
        "Launch announcement",
        "We shipped!",
        "issue-42",
    )
}

#[tokio::test]
async fn test_explicit_stop_drains_buffered_jobs() {
    let mailer = Arc::new(MockMailSender::new_delayed(Duration::from_millis(10)));
    let (_shutdown_tx, shutdown_rx) = shutdown_channel();
    let pool = DispatchPool::start(
        DispatchConfig {
            worker_count: 2,
            queue_capacity: 32,
            send_timeout: Duration::from_secs(5),
        },
        mailer.clone(),
        Arc::new(LogFailureSink),
        shutdown_rx,
    );

    for n in 0..20 {
        pool.enqueue(job(n)).await.unwrap();
    }

    pool.stop().await;

    assert_eq!(mailer.call_count(), 20);
    assert_eq!(mailer.delivered_recipients().len(), 20);
}

#[tokio::test]
async fn test_token_cancellation_stops_the_pool() {
    let mailer = Arc::new(MockMailSender::new_success());
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let pool = DispatchPool::start(
        DispatchConfig {
            worker_count: 2,
            queue_capacity: 8,
            send_timeout: Duration::from_secs(5),
        },
        mailer.clone(),
        Arc::new(LogFailureSink),
        shutdown_rx,
    );

    for n in 0..5 {
        pool.enqueue(job(n)).await.unwrap();
    }

    // Cancel the lifecycle token; the supervisory task runs the stop path.
    shutdown_tx.shutdown();

    // stop() from this side just waits for that drain to complete.
    tokio::time::timeout(Duration::from_secs(2), pool.stop())
        .await
        .expect("pool should drain promptly");

    assert!(pool.is_shutting_down());
    assert_eq!(mailer.call_count(), 5);

    // The queue is closed for good: producers get an error, not a crash.
    let late = pool.enqueue(job(99)).await;
    assert!(matches!(late, Err(DispatchError::QueueClosed)));
}

#[tokio::test]
async fn test_defaulted_config_starts_and_stops() {
    let mailer = Arc::new(MockMailSender::new_success());
    let (_shutdown_tx, shutdown_rx) = shutdown_channel();

    // Zero sizing falls back to documented defaults instead of failing.
    let pool = DispatchPool::start(
        DispatchConfig {
            worker_count: 0,
            queue_capacity: 0,
            send_timeout: Duration::ZERO,
        },
        mailer.clone(),
        Arc::new(LogFailureSink),
        shutdown_rx,
    );

    pool.enqueue(job(0)).await.unwrap();
    pool.stop().await;
    assert_eq!(mailer.call_count(), 1);
}
