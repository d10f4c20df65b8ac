//! Notification errors

use thiserror::Error;

/// Notification errors
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Message construction or SMTP delivery failure
    #[error("email error: {0}")]
    Email(String),
}
