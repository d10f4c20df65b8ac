//! Email sender abstraction and job type

use async_trait::async_trait;

use crate::NotifyError;

/// A queued course-update notification for one subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseUpdateEmail {
    /// Subscriber address
    pub recipient: String,
    /// Title of the updated course
    pub course_title: String,
    /// What changed: the course itself or a named lesson
    pub change: String,
}

impl CourseUpdateEmail {
    /// Message subject line
    pub fn subject(&self) -> String {
        format!("Обновление курса: {}", self.course_title)
    }

    /// Message body
    pub fn body(&self) -> String {
        format!(
            "В вашем курсе \"{}\" появилось новое обновление: {}.",
            self.course_title, self.change
        )
    }
}

/// Email sender trait
///
/// Abstracts the transport so the queue worker can be tested without an
/// SMTP relay.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver one notification
    async fn send(&self, email: &CourseUpdateEmail) -> Result<(), NotifyError>;
}
