//! Payment provider abstraction

use async_trait::async_trait;

use lyceum_types::CheckoutSession;

use crate::BillingError;

/// Payment provider trait
///
/// Abstracts the gateway's product/price/checkout-session chain so the
/// orchestration can be tested without network access.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a product representing the paid course or lesson
    async fn create_product(&self, name: &str) -> Result<String, BillingError>;

    /// Create a price for a product; `unit_amount` is in the currency's
    /// minor units
    async fn create_price(&self, product_id: &str, unit_amount: i64)
        -> Result<String, BillingError>;

    /// Create a checkout session for a price
    async fn create_checkout_session(&self, price_id: &str)
        -> Result<CheckoutSession, BillingError>;
}
