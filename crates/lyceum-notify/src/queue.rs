//! In-process notification queue
//!
//! Fire-and-forget dispatch: handlers enqueue jobs synchronously and a
//! worker task drains them to the mailer. Delivery is at-least-once from
//! the enqueuer's point of view and unordered; a failed send is logged
//! and the worker moves on to the next job.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::mailer::{CourseUpdateEmail, EmailSender};

/// Cloneable handle for enqueueing notification jobs
#[derive(Clone)]
pub struct NotificationQueue {
    tx: mpsc::UnboundedSender<CourseUpdateEmail>,
}

impl NotificationQueue {
    /// Create a queue handle and its receiving end without a worker.
    ///
    /// Used by [`NotificationQueue::start`] and by tests that want to
    /// observe enqueued jobs directly.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CourseUpdateEmail>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Create a queue and spawn the worker task draining it to `mailer`.
    ///
    /// The worker exits once every queue handle is dropped and the
    /// remaining jobs are processed.
    pub fn start<M>(mailer: M) -> (Self, JoinHandle<()>)
    where
        M: EmailSender + 'static,
    {
        let (queue, mut rx) = Self::channel();

        let handle = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                match mailer.send(&job).await {
                    Ok(()) => {
                        metrics::counter!("notifications_sent_total").increment(1);
                    }
                    Err(e) => {
                        // Isolated per job: log and keep draining.
                        warn!(recipient = %job.recipient, error = %e, "notification send failed");
                        metrics::counter!("notifications_failed_total").increment(1);
                    }
                }
            }
        });

        (queue, handle)
    }

    /// Enqueue a notification job.
    ///
    /// Never blocks and never fails the caller; if the worker is gone the
    /// job is dropped with a warning.
    pub fn enqueue(&self, job: CourseUpdateEmail) {
        metrics::counter!("notifications_queued_total").increment(1);
        if self.tx.send(job).is_err() {
            warn!("notification worker stopped; job dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NotifyError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Mailer that records deliveries and fails for one address
    #[derive(Clone, Default)]
    struct RecordingMailer {
        sent: Arc<Mutex<Vec<String>>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl EmailSender for RecordingMailer {
        async fn send(&self, email: &CourseUpdateEmail) -> Result<(), NotifyError> {
            if self.fail_for.as_deref() == Some(email.recipient.as_str()) {
                return Err(NotifyError::Email("simulated delivery failure".into()));
            }
            self.sent.lock().unwrap().push(email.recipient.clone());
            Ok(())
        }
    }

    fn job(recipient: &str) -> CourseUpdateEmail {
        CourseUpdateEmail {
            recipient: recipient.to_string(),
            course_title: "Test Course".to_string(),
            change: "курс".to_string(),
        }
    }

    #[tokio::test]
    async fn test_worker_drains_all_jobs() {
        let mailer = RecordingMailer::default();
        let sent = Arc::clone(&mailer.sent);

        let (queue, handle) = NotificationQueue::start(mailer);
        queue.enqueue(job("a@example.com"));
        queue.enqueue(job("b@example.com"));
        queue.enqueue(job("c@example.com"));

        drop(queue);
        handle.await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_others() {
        let mailer = RecordingMailer {
            fail_for: Some("broken@example.com".to_string()),
            ..Default::default()
        };
        let sent = Arc::clone(&mailer.sent);

        let (queue, handle) = NotificationQueue::start(mailer);
        queue.enqueue(job("a@example.com"));
        queue.enqueue(job("broken@example.com"));
        queue.enqueue(job("b@example.com"));

        drop(queue);
        handle.await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.as_slice(), ["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn test_enqueue_after_worker_gone_is_silent() {
        let (queue, rx) = NotificationQueue::channel();
        drop(rx);

        // Must not panic or block.
        queue.enqueue(job("a@example.com"));
    }
}
