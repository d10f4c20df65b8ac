//! Lyceum Notify - Subscriber email dispatch
//!
//! Course-update notifications are enqueued on an in-process queue and
//! drained by a worker task, so the request path never blocks on mail
//! delivery and one subscriber's delivery failure cannot affect another's.

pub mod error;
pub mod mailer;
pub mod queue;
pub mod smtp;

pub use error::NotifyError;
pub use mailer::{CourseUpdateEmail, EmailSender};
pub use queue::NotificationQueue;
pub use smtp::{SmtpConfig, SmtpMailer};
