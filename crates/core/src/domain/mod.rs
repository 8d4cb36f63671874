// Domain Layer - Pure values, no behavior beyond construction

pub mod email;

// Re-exports
pub use email::{EmailJob, IssueId};
