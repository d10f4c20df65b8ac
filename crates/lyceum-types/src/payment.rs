//! Payment types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique payment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub Uuid);

impl PaymentId {
    /// Create a new random payment ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a payment ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PaymentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash payment
    Cash,
    /// Bank transfer
    Transfer,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = PaymentMethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "transfer" => Ok(Self::Transfer),
            _ => Err(PaymentMethodParseError(s.to_string())),
        }
    }
}

/// Error parsing a payment method string
#[derive(Debug, Clone)]
pub struct PaymentMethodParseError(pub String);

impl std::fmt::Display for PaymentMethodParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid payment method: {}", self.0)
    }
}

impl std::error::Error for PaymentMethodParseError {}

/// Checkout session returned by the payment gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Gateway session ID
    pub session_id: String,
    /// URL the user completes the payment at
    pub url: String,
}
