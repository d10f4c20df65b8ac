//! SMTP mailer implementation using Lettre

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::mailer::{CourseUpdateEmail, EmailSender};
use crate::NotifyError;

/// SMTP relay configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay host (e.g. "smtp.yandex.ru")
    pub host: String,
    /// Relay port (usually 587 for TLS)
    pub port: u16,
    /// Auth username
    pub username: String,
    /// Auth password
    pub password: String,
    /// Sender address
    pub from_email: String,
}

/// SMTP email sender
#[derive(Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Credentials,
    from_email: String,
}

impl SmtpMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SmtpConfig) -> Self {
        let credentials = Credentials::new(config.username, config.password);

        Self {
            host: config.host,
            port: config.port,
            credentials,
            from_email: config.from_email,
        }
    }

    /// Build SMTP transport for sending emails.
    ///
    /// A fresh transport per message avoids stale pooled connections.
    fn build_transport(&self) -> Result<SmtpTransport, NotifyError> {
        Ok(SmtpTransport::relay(&self.host)
            .map_err(|e| NotifyError::Email(format!("SMTP relay error: {e}")))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn send(&self, email: &CourseUpdateEmail) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .map_err(|e| NotifyError::Email(format!("Invalid from address: {e}")))?,
            )
            .to(email
                .recipient
                .parse()
                .map_err(|e| NotifyError::Email(format!("Invalid to address: {e}")))?)
            .subject(email.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body())
            .map_err(|e| NotifyError::Email(format!("Failed to build email: {e}")))?;

        let mailer = self.build_transport()?;

        // lettre's blocking transport; sending happens off the runtime.
        tokio::task::spawn_blocking(move || {
            mailer
                .send(&message)
                .map_err(|e| NotifyError::Email(format!("Failed to send email: {e}")))
        })
        .await
        .map_err(|e| NotifyError::Email(format!("Email task failed: {e}")))?
        .map(|_| ())
    }
}
