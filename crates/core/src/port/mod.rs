// Port Layer - Interfaces for external collaborators

pub mod failure_sink;
pub mod mail_sender;

// Re-exports
pub use failure_sink::{FailureSink, LogFailureSink};
pub use mail_sender::{MailSender, SendError};
