//! PostgreSQL course repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::CourseRow;
use crate::repo::{CourseRepository, CreateCourse, UpdateCourse};

/// PostgreSQL course repository
#[derive(Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    /// Create a new course repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<CourseRow>> {
        let course = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, title, description, preview, owner_id, last_updated, created_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<CourseRow>> {
        let courses = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, title, description, preview, owner_id, last_updated, created_at
            FROM courses
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    async fn count(&self) -> DbResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn create(&self, course: CreateCourse) -> DbResult<CourseRow> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            INSERT INTO courses (id, title, description, preview, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, preview, owner_id, last_updated, created_at
            "#,
        )
        .bind(course.id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.preview)
        .bind(course.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, update: UpdateCourse) -> DbResult<CourseRow> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            UPDATE courses
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                preview = COALESCE($3, preview)
            WHERE id = $4
            RETURNING id, title, description, preview, owner_id, last_updated, created_at
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.preview)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn set_last_updated(&self, id: Uuid, at: DateTime<Utc>) -> DbResult<()> {
        sqlx::query("UPDATE courses SET last_updated = $1 WHERE id = $2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
