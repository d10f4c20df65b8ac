//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Unique constraint violation
    ///
    /// Surfaced separately because the subscription toggle must treat a
    /// duplicate (user, course) insert as "already subscribed".
    #[error("unique constraint violation")]
    UniqueViolation,
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.is_unique_violation() {
                return Self::UniqueViolation;
            }
        }
        Self::Sqlx(err)
    }
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
