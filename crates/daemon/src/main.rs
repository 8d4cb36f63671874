//! Mailcast Dispatch Daemon - Main Entry Point
//! Runs the email dispatch pool behind a dev transport until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use mailcast_core::application::{shutdown_channel, DispatchConfig, DispatchPool};
use mailcast_core::port::LogFailureSink;
use mailcast_infra_mail::TracingMailSender;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (JSON for production, pretty for development)
    let log_format = std::env::var("MAILCAST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("mailcast=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Mailcast dispatch daemon v{} starting...", VERSION);

    // 2. Load configuration (zero values fall back to engine defaults)
    let config = DispatchConfig {
        worker_count: env_usize("MAILCAST_WORKERS", 0),
        queue_capacity: env_usize("MAILCAST_QUEUE_CAPACITY", 0),
        send_timeout: Duration::from_secs(env_usize("MAILCAST_SEND_TIMEOUT_SECS", 30) as u64),
    };

    // 3. Setup dependencies (DI wiring)
    let mailer = Arc::new(TracingMailSender::new());
    let failure_sink = Arc::new(LogFailureSink);

    // 4. Start dispatch pool
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let pool = DispatchPool::start(config, mailer, failure_sink, shutdown_rx);

    info!("System ready. Waiting for jobs...");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Draining...");

    // 6. Graceful shutdown: signal the lifecycle token, then wait for the
    // drain to complete. Both triggers converge on the same stop path.
    shutdown_tx.shutdown();
    pool.stop().await;

    info!("Shutdown complete.");
    Ok(())
}
