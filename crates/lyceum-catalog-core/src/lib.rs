//! Lyceum Catalog Core - Courses, lessons and subscriptions
//!
//! The catalog business logic: CRUD with the owner/moderator authorization
//! policy, video-URL validation, the per-course notification throttle, and
//! the subscription toggle.

pub mod error;
pub mod policy;
pub mod service;
pub mod validate;

pub use error::CatalogError;
pub use service::{
    CatalogService, CourseDetail, CourseUpdateOutcome, CreateCourseInput, CreateLessonInput,
    LessonUpdateOutcome, Page,
};
pub use validate::validate_video_url;
