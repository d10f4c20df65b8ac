//! Auth configuration

use chrono::Duration;

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Create a config with the default token lifetimes
    /// (15 minute access, 24 hour refresh)
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::hours(24),
        }
    }

    /// Override token lifetimes
    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }
}
