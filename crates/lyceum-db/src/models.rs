//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// User row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Course row from the database
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
    pub owner_id: Option<Uuid>,
    pub last_updated: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Lesson row from the database
#[derive(Debug, Clone, FromRow)]
pub struct LessonRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
    pub video_url: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Subscription row from the database
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payment row from the database
#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub paid_course_id: Option<Uuid>,
    pub paid_lesson_id: Option<Uuid>,
    pub amount: i64,
    pub payment_method: String,
    pub stripe_session_id: Option<String>,
    pub payment_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Conversion helpers from row types to lyceum-types domain ids
impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> lyceum_types::UserId {
        lyceum_types::UserId(self.id)
    }
}

impl CourseRow {
    /// Convert to domain CourseId
    pub fn course_id(&self) -> lyceum_types::CourseId {
        lyceum_types::CourseId(self.id)
    }
}

impl LessonRow {
    /// Convert to domain LessonId
    pub fn lesson_id(&self) -> lyceum_types::LessonId {
        lyceum_types::LessonId(self.id)
    }

    /// Convert to the parent domain CourseId
    pub fn course_id(&self) -> lyceum_types::CourseId {
        lyceum_types::CourseId(self.course_id)
    }
}
