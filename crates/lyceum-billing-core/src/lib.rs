//! Lyceum Billing Core - Payment orchestration
//!
//! Drives the external checkout flow for paid courses and lessons:
//! persist the payment row, then product -> price -> checkout session
//! against the gateway, then enrich the row with the session data.
//!
//! # Example
//!
//! ```rust,ignore
//! use lyceum_billing_core::{BillingConfig, PaymentService, StripeProvider};
//!
//! let config = BillingConfig::new("sk_test_...").with_success_url("https://app/payments");
//! let provider = StripeProvider::new(config);
//! let payments = PaymentService::new(repos.payments, repos.courses, repos.lessons, provider);
//!
//! let row = payments.create_payment(&actor, request).await?;
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod service;
pub mod stripe;

pub use config::BillingConfig;
pub use error::BillingError;
pub use provider::PaymentProvider;
pub use service::{CreatePaymentRequest, PaymentService};
pub use stripe::StripeProvider;

// Re-export the session type for convenience
pub use lyceum_types::CheckoutSession;
