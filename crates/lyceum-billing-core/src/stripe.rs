//! Stripe payment provider implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use lyceum_types::CheckoutSession;

use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::provider::PaymentProvider;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Stripe payment provider
#[derive(Clone)]
pub struct StripeProvider {
    client: Client,
    config: BillingConfig,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: BillingConfig) -> Self {
        let client = Client::new();
        Self { client, config }
    }

    /// Make authenticated request to Stripe
    async fn stripe_request<T: for<'de> Deserialize<'de>>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        form: Option<&[(&str, &str)]>,
    ) -> Result<T, BillingError> {
        let url = format!("{STRIPE_API_BASE}{endpoint}");

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.config.stripe_secret_key, Option::<&str>::None);

        if let Some(form_data) = form {
            request = request.form(form_data);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Stripe API request failed");
            BillingError::ProviderError(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Stripe API error");
            return Err(BillingError::ProviderError(format!(
                "Stripe API error: {status}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Stripe response");
            BillingError::Internal(e.to_string())
        })
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[instrument(skip(self))]
    async fn create_product(&self, name: &str) -> Result<String, BillingError> {
        debug!(name = %name, "Creating Stripe product");

        let form = [("name", name)];
        let product: StripeProduct = self
            .stripe_request(reqwest::Method::POST, "/products", Some(&form))
            .await?;

        Ok(product.id)
    }

    #[instrument(skip(self))]
    async fn create_price(
        &self,
        product_id: &str,
        unit_amount: i64,
    ) -> Result<String, BillingError> {
        debug!(product_id = %product_id, unit_amount, "Creating Stripe price");

        let unit_amount = unit_amount.to_string();
        let form = [
            ("currency", self.config.currency.as_str()),
            ("unit_amount", &unit_amount),
            ("product", product_id),
        ];

        let price: StripePrice = self
            .stripe_request(reqwest::Method::POST, "/prices", Some(&form))
            .await?;

        Ok(price.id)
    }

    #[instrument(skip(self))]
    async fn create_checkout_session(
        &self,
        price_id: &str,
    ) -> Result<CheckoutSession, BillingError> {
        debug!(price_id = %price_id, "Creating checkout session");

        let form = [
            ("success_url", self.config.success_url.as_str()),
            ("mode", "payment"),
            ("line_items[0][price]", price_id),
            ("line_items[0][quantity]", "1"),
        ];

        let session: StripeCheckoutSession = self
            .stripe_request(reqwest::Method::POST, "/checkout/sessions", Some(&form))
            .await?;

        Ok(CheckoutSession {
            session_id: session.id,
            url: session.url.unwrap_or_default(),
        })
    }
}

// Stripe API response types

/// Stripe product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeProduct {
    /// Product ID
    pub id: String,
    /// Product name
    pub name: Option<String>,
}

/// Stripe price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripePrice {
    /// Price ID
    pub id: String,
    /// Product the price belongs to
    pub product: Option<String>,
    /// Amount in minor units
    pub unit_amount: Option<i64>,
    /// Currency
    pub currency: Option<String>,
}

/// Stripe checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeCheckoutSession {
    /// Session ID
    pub id: String,
    /// Checkout URL
    pub url: Option<String>,
}
