//! Billing errors

use thiserror::Error;

/// Billing errors
#[derive(Error, Debug)]
pub enum BillingError {
    /// Paid course not found
    #[error("course not found")]
    CourseNotFound,

    /// Paid lesson not found
    #[error("lesson not found")]
    LessonNotFound,

    /// A payment must reference exactly one of course or lesson
    #[error("exactly one of paid course or paid lesson must be set")]
    InvalidPaymentTarget,

    /// Amount must be positive
    #[error("amount must be positive")]
    InvalidAmount,

    /// Payment gateway error; the payment row from step 1 is preserved
    #[error("provider error: {0}")]
    ProviderError(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] lyceum_db::DbError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CourseNotFound | Self::LessonNotFound)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidPaymentTarget | Self::InvalidAmount)
    }
}
