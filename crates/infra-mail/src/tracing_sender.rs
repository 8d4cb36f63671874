// Tracing Mail Sender - development transport
// Logs each delivery instead of handing it to a real provider, so the daemon
// runs end to end without SMTP credentials.

use async_trait::async_trait;
use mailcast_core::port::{MailSender, SendError};
use std::time::Duration;
use tracing::info;

pub struct TracingMailSender {
    /// Artificial per-send latency, for exercising back-pressure locally
    latency: Duration,
}

impl TracingMailSender {
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for TracingMailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailSender for TracingMailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), SendError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        info!(
            recipient = %to,
            subject = %subject,
            body_bytes = body.len(),
            "email handed to transport (dev mode)"
        );
        Ok(())
    }
}
