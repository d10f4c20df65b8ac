//! Configuration for the Catalog API service.

use std::time::Duration;

use lyceum_auth_core::AuthConfig;
use lyceum_billing_core::BillingConfig;
use lyceum_notify::SmtpConfig;

/// Catalog API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Auth core configuration
    pub auth: AuthConfig,
    /// Billing core configuration
    pub billing: BillingConfig,
    /// SMTP relay configuration
    pub smtp: SmtpConfig,
    /// Minimum interval between subscriber notifications per course
    pub notify_throttle: chrono::Duration,
    /// Accounts idle longer than this are deactivated by the daily sweep
    pub inactive_after: chrono::Duration,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Token signing
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        // Stripe configuration
        let stripe_secret_key = std::env::var("STRIPE_API_KEY")
            .map_err(|_| ConfigError::Missing("STRIPE_API_KEY"))?;

        let payment_success_url = std::env::var("PAYMENT_SUCCESS_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/users/payments".to_string());

        let payment_currency =
            std::env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "rub".to_string());

        // Mail relay
        let smtp_host =
            std::env::var("EMAIL_HOST").map_err(|_| ConfigError::Missing("EMAIL_HOST"))?;
        let smtp_port = std::env::var("EMAIL_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("EMAIL_PORT"))?;
        let smtp_username = std::env::var("EMAIL_HOST_USER")
            .map_err(|_| ConfigError::Missing("EMAIL_HOST_USER"))?;
        let smtp_password = std::env::var("EMAIL_HOST_PASSWORD")
            .map_err(|_| ConfigError::Missing("EMAIL_HOST_PASSWORD"))?;
        let from_email =
            std::env::var("EMAIL_FROM").unwrap_or_else(|_| "noreply@yourdomain.com".to_string());

        // Workflow knobs
        let notify_throttle_hours: i64 = std::env::var("NOTIFY_THROTTLE_HOURS")
            .unwrap_or_else(|_| "4".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("NOTIFY_THROTTLE_HOURS"))?;

        let inactive_after_days: i64 = std::env::var("INACTIVE_AFTER_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("INACTIVE_AFTER_DAYS"))?;

        // Request timeout
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Metrics
        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let billing = BillingConfig::new(&stripe_secret_key)
            .with_success_url(&payment_success_url)
            .with_currency(&payment_currency);

        let smtp = SmtpConfig {
            host: smtp_host,
            port: smtp_port,
            username: smtp_username,
            password: smtp_password,
            from_email,
        };

        Ok(Self {
            http_port,
            database_url,
            auth: AuthConfig::new(jwt_secret),
            billing,
            smtp,
            notify_throttle: chrono::Duration::hours(notify_throttle_hours),
            inactive_after: chrono::Duration::days(inactive_after_days),
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
