//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// Update profile fields
    async fn update(&self, id: Uuid, update: UpdateUser) -> DbResult<UserRow>;

    /// Record a successful login
    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> DbResult<()>;

    /// Deactivate active accounts whose last login predates the cutoff.
    ///
    /// Accounts that never logged in are measured from their creation time.
    /// Returns the number of accounts deactivated; already-inactive rows are
    /// not re-matched, so repeated sweeps are no-ops.
    async fn deactivate_inactive(&self, cutoff: DateTime<Utc>) -> DbResult<u64>;

    /// Delete a user
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub role: String,
}

/// Update user input; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// Course repository trait
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Find a course by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<CourseRow>>;

    /// List courses, newest first
    async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<CourseRow>>;

    /// Total number of courses
    async fn count(&self) -> DbResult<i64>;

    /// Create a new course
    async fn create(&self, course: CreateCourse) -> DbResult<CourseRow>;

    /// Update course fields
    async fn update(&self, id: Uuid, update: UpdateCourse) -> DbResult<CourseRow>;

    /// Advance the notification throttle timestamp
    async fn set_last_updated(&self, id: Uuid, at: DateTime<Utc>) -> DbResult<()>;

    /// Delete a course (cascades to lessons and subscriptions)
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

/// Create course input
#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
    pub owner_id: Option<Uuid>,
}

/// Update course input
#[derive(Debug, Clone, Default)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview: Option<String>,
}

/// Lesson repository trait
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Find a lesson by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<LessonRow>>;

    /// List lessons, newest first
    async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<LessonRow>>;

    /// Total number of lessons
    async fn count(&self) -> DbResult<i64>;

    /// All lessons belonging to a course
    async fn list_by_course(&self, course_id: Uuid) -> DbResult<Vec<LessonRow>>;

    /// Number of lessons belonging to a course
    async fn count_by_course(&self, course_id: Uuid) -> DbResult<i64>;

    /// Create a new lesson
    async fn create(&self, lesson: CreateLesson) -> DbResult<LessonRow>;

    /// Update lesson fields
    async fn update(&self, id: Uuid, update: UpdateLesson) -> DbResult<LessonRow>;

    /// Delete a lesson
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

/// Create lesson input
#[derive(Debug, Clone)]
pub struct CreateLesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
    pub video_url: Option<String>,
    pub owner_id: Option<Uuid>,
}

/// Update lesson input
#[derive(Debug, Clone, Default)]
pub struct UpdateLesson {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview: Option<String>,
    pub video_url: Option<String>,
}

/// Subscription repository trait
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Find a subscription for a (user, course) pair
    async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DbResult<Option<SubscriptionRow>>;

    /// Create a subscription.
    ///
    /// Fails with `DbError::UniqueViolation` when a row for the same
    /// (user, course) pair already exists.
    async fn create(&self, sub: CreateSubscription) -> DbResult<SubscriptionRow>;

    /// Remove the subscription for a (user, course) pair.
    /// Returns the number of rows removed.
    async fn delete_by_user_and_course(&self, user_id: Uuid, course_id: Uuid) -> DbResult<u64>;

    /// All active subscriptions for a course
    async fn list_active_by_course(&self, course_id: Uuid) -> DbResult<Vec<SubscriptionRow>>;
}

/// Create subscription input
#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
}

/// Sort direction for payment listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    /// Oldest first (the default)
    #[default]
    Asc,
    /// Newest first
    Desc,
}

/// Optional filters for payment listings
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub paid_course_id: Option<Uuid>,
    pub paid_lesson_id: Option<Uuid>,
    pub payment_method: Option<String>,
    pub order: DateOrder,
}

/// Payment repository trait
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Find a payment by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<PaymentRow>>;

    /// Create a new payment
    async fn create(&self, payment: CreatePayment) -> DbResult<PaymentRow>;

    /// Attach gateway checkout-session data to a payment
    async fn set_checkout_session(&self, id: Uuid, session_id: &str, url: &str) -> DbResult<()>;

    /// List a user's payments with optional filters
    async fn list_by_user(&self, user_id: Uuid, filter: PaymentFilter)
        -> DbResult<Vec<PaymentRow>>;
}

/// Create payment input
#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub paid_course_id: Option<Uuid>,
    pub paid_lesson_id: Option<Uuid>,
    pub amount: i64,
    pub payment_method: String,
}
