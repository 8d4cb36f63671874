//! Newsletter fan-out integration test
//!
//! Mirrors how the wider application uses the engine: once an issue is
//! published, one job per active subscriber is enqueued from the publishing
//! request path, then the process later shuts down cleanly.

use std::sync::Arc;
use std::time::Duration;

use mailcast_core::application::{shutdown_channel, DispatchConfig, DispatchPool};
use mailcast_core::domain::EmailJob;
use mailcast_core::port::failure_sink::mocks::CollectingFailureSink;
use mailcast_core::port::mail_sender::mocks::{MockBehavior, MockMailSender};
use mailcast_infra_mail::TracingMailSender;
use tokio::task::JoinSet;

#[tokio::test]
async fn test_issue_fanout_reaches_every_subscriber() {
    let mailer = Arc::new(MockMailSender::new_success());
    let sink = Arc::new(CollectingFailureSink::new());
    let (_shutdown_tx, shutdown_rx) = shutdown_channel();
    let pool = DispatchPool::start(
        DispatchConfig {
            worker_count: 4,
            queue_capacity: 16,
            send_timeout: Duration::from_secs(5),
        },
        mailer.clone(),
        sink.clone(),
        shutdown_rx,
    );

    // Three issues published concurrently, 30 subscribers each.
    let mut publishers = JoinSet::new();
    for issue in 0..3 {
        let pool = Arc::clone(&pool);
        publishers.spawn(async move {
            for n in 0..30 {
                let job = EmailJob::new(
                    format!("subscriber{}@example.com", n),
                    format!("Issue #{}", issue),
                    "This week in Mailcast...",
                    format!("issue-{}", issue),
                );
                pool.enqueue(job).await.unwrap();
            }
        });
    }
    while let Some(result) = publishers.join_next().await {
        result.unwrap();
    }

    pool.stop().await;

    assert_eq!(mailer.call_count(), 90);
    assert!(sink.discarded_jobs().is_empty());
}

#[tokio::test]
async fn test_failed_sends_are_collected_not_retried() {
    let mailer = Arc::new(MockMailSender::new_success());
    let sink = Arc::new(CollectingFailureSink::new());
    let (_shutdown_tx, shutdown_rx) = shutdown_channel();
    let pool = DispatchPool::start(
        DispatchConfig {
            worker_count: 1,
            queue_capacity: 8,
            send_timeout: Duration::from_secs(5),
        },
        mailer.clone(),
        sink.clone(),
        shutdown_rx,
    );

    pool.enqueue(EmailJob::new(
        "good@example.com",
        "Issue #1",
        "Body",
        "issue-1",
    ))
    .await
    .unwrap();

    // Wait for the first job to complete before flipping the transport into
    // failure mode for the rest of the run.
    while mailer.delivered_recipients().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    mailer.set_behavior(MockBehavior::Fail("mailbox unavailable".into()));

    pool.enqueue(EmailJob::new(
        "gone@example.com",
        "Issue #1",
        "Body",
        "issue-1",
    ))
    .await
    .unwrap();

    pool.stop().await;

    // One attempt per job, exactly one landed in the sink.
    assert_eq!(mailer.call_count(), 2);
    let discarded = sink.discarded_jobs();
    assert_eq!(discarded.len(), 1);
    assert_eq!(discarded[0].0.to, "gone@example.com");
    assert!(discarded[0].1.contains("mailbox unavailable"));
}

#[tokio::test]
async fn test_dev_transport_wiring() {
    // Daemon-style composition: dev transport, default failure sink behavior
    // swapped for a collecting sink so the test can assert nothing failed.
    let sink = Arc::new(CollectingFailureSink::new());
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let pool = DispatchPool::start(
        DispatchConfig {
            worker_count: 2,
            queue_capacity: 4,
            send_timeout: Duration::from_secs(5),
        },
        Arc::new(TracingMailSender::with_latency(Duration::from_millis(5))),
        sink.clone(),
        shutdown_rx,
    );

    for n in 0..10 {
        pool.enqueue(EmailJob::new(
            format!("subscriber{}@example.com", n),
            "Issue #7",
            "Body",
            "issue-7",
        ))
        .await
        .unwrap();
    }

    shutdown_tx.shutdown();
    pool.stop().await;

    assert!(sink.discarded_jobs().is_empty());
}
