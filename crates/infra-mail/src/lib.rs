// Mailcast Infrastructure - Mail Transport Adapters
// Implements: MailSender

pub mod tracing_sender;

pub use tracing_sender::TracingMailSender;
