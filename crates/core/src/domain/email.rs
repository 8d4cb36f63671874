// Email Job Domain Model

use serde::{Deserialize, Serialize};

/// Correlation identifier tying a job to the newsletter issue it belongs to.
/// Used only for logging and diagnosis, never interpreted by the engine.
pub type IssueId = String;

/// One email to send: immutable once constructed, consumed exactly once by
/// whichever worker dequeues it.
///
/// The engine performs no validation of these fields; supplying a deliverable
/// recipient address and non-empty subject/body is the producer's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub issue_id: IssueId,
}

impl EmailJob {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        issue_id: impl Into<IssueId>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            issue_id: issue_id.into(),
        }
    }
}
