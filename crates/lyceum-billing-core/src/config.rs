//! Billing configuration

/// Billing service configuration
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// ISO currency code the catalog charges in (two-decimal currency)
    pub currency: String,
    /// Where the gateway redirects after a completed payment
    pub success_url: String,
}

impl BillingConfig {
    /// Create a new billing config
    pub fn new(stripe_secret_key: impl Into<String>) -> Self {
        Self {
            stripe_secret_key: stripe_secret_key.into(),
            currency: "rub".to_string(),
            success_url: "http://127.0.0.1:8000/users/payments".to_string(),
        }
    }

    /// Set the post-payment redirect target
    pub fn with_success_url(mut self, success_url: impl Into<String>) -> Self {
        self.success_url = success_url.into();
        self
    }

    /// Set the charge currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}
