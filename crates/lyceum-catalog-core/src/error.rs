//! Catalog errors

use thiserror::Error;

/// Catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Course not found
    #[error("course not found")]
    CourseNotFound,

    /// Lesson not found
    #[error("lesson not found")]
    LessonNotFound,

    /// Authorization policy violation
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Input rejected before persistence
    #[error("validation failed on {field}: {message}")]
    Validation {
        /// Offending field
        field: &'static str,
        /// Human-readable detail
        message: String,
    },

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] lyceum_db::DbError),
}

impl CatalogError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CourseNotFound | Self::LessonNotFound)
    }
}
