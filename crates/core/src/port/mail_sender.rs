// Mail Sender Port
// Abstraction over the concrete mail transport (SMTP, provider HTTP API)

use async_trait::async_trait;
use thiserror::Error;

/// Delivery errors reported by the transport
#[derive(Error, Debug)]
pub enum SendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rejected by provider: {0}")]
    Rejected(String),
}

/// Mail Sender trait
///
/// The one operation workers consume. The concrete transport is irrelevant to
/// the dispatch engine and must remain swappable behind this boundary.
///
/// Implementations:
/// - TracingMailSender (infra-mail): development transport, logs instead of sending
/// - mocks::MockMailSender: testing
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Attempt delivery of one email.
    ///
    /// # Errors
    /// - SendError::Transport if the transport could not be reached
    /// - SendError::Rejected if the provider refused the message
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), SendError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Mock sender behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Complete instantly
        Success,
        /// Always fail with message
        Fail(String),
        /// Sleep for the given duration, then succeed
        Delay(Duration),
        /// Never return (for timeout testing)
        Hang,
    }

    /// Mock Mail Sender for testing
    pub struct MockMailSender {
        behavior: Arc<Mutex<MockBehavior>>,
        call_count: Arc<Mutex<usize>>,
        delivered: Arc<Mutex<Vec<String>>>,
    }

    impl MockMailSender {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                call_count: Arc::new(Mutex::new(0)),
                delivered: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        pub fn new_delayed(delay: Duration) -> Self {
            Self::new(MockBehavior::Delay(delay))
        }

        pub fn new_hanging() -> Self {
            Self::new(MockBehavior::Hang)
        }

        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        /// Number of times send() was invoked (counted at dispatch, before
        /// the behavior runs)
        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }

        /// Recipients of sends that ran to successful completion
        pub fn delivered_recipients(&self) -> Vec<String> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailSender for MockMailSender {
        async fn send(&self, to: &str, _subject: &str, _body: &str) -> Result<(), SendError> {
            *self.call_count.lock().unwrap() += 1;

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Success => {
                    self.delivered.lock().unwrap().push(to.to_string());
                    Ok(())
                }
                MockBehavior::Fail(msg) => Err(SendError::Transport(msg)),
                MockBehavior::Delay(delay) => {
                    tokio::time::sleep(delay).await;
                    self.delivered.lock().unwrap().push(to.to_string());
                    Ok(())
                }
                MockBehavior::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!("pending future resolved")
                }
            }
        }
    }
}
