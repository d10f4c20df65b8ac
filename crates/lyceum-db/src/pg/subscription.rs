//! PostgreSQL subscription repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::SubscriptionRow;
use crate::repo::{CreateSubscription, SubscriptionRepository};

/// PostgreSQL subscription repository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new subscription repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DbResult<Option<SubscriptionRow>> {
        let sub = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, user_id, course_id, is_active, created_at
            FROM subscriptions
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sub)
    }

    async fn create(&self, sub: CreateSubscription) -> DbResult<SubscriptionRow> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            INSERT INTO subscriptions (id, user_id, course_id, is_active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING id, user_id, course_id, is_active, created_at
            "#,
        )
        .bind(sub.id)
        .bind(sub.user_id)
        .bind(sub.course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_by_user_and_course(&self, user_id: Uuid, course_id: Uuid) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND course_id = $2")
            .bind(user_id)
            .bind(course_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_active_by_course(&self, course_id: Uuid) -> DbResult<Vec<SubscriptionRow>> {
        let subs = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, user_id, course_id, is_active, created_at
            FROM subscriptions
            WHERE course_id = $1 AND is_active = TRUE
            ORDER BY created_at
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }
}
