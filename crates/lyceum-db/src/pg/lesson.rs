//! PostgreSQL lesson repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::LessonRow;
use crate::repo::{CreateLesson, LessonRepository, UpdateLesson};

/// PostgreSQL lesson repository
#[derive(Clone)]
pub struct PgLessonRepository {
    pool: PgPool,
}

impl PgLessonRepository {
    /// Create a new lesson repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LessonRepository for PgLessonRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<LessonRow>> {
        let lesson = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT id, course_id, title, description, preview, video_url, owner_id, created_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lesson)
    }

    async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<LessonRow>> {
        let lessons = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT id, course_id, title, description, preview, video_url, owner_id, created_at
            FROM lessons
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    async fn count(&self) -> DbResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lessons")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn list_by_course(&self, course_id: Uuid) -> DbResult<Vec<LessonRow>> {
        let lessons = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT id, course_id, title, description, preview, video_url, owner_id, created_at
            FROM lessons
            WHERE course_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    async fn count_by_course(&self, course_id: Uuid) -> DbResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lessons WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn create(&self, lesson: CreateLesson) -> DbResult<LessonRow> {
        let row = sqlx::query_as::<_, LessonRow>(
            r#"
            INSERT INTO lessons (id, course_id, title, description, preview, video_url, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, course_id, title, description, preview, video_url, owner_id, created_at
            "#,
        )
        .bind(lesson.id)
        .bind(lesson.course_id)
        .bind(&lesson.title)
        .bind(&lesson.description)
        .bind(&lesson.preview)
        .bind(&lesson.video_url)
        .bind(lesson.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, update: UpdateLesson) -> DbResult<LessonRow> {
        let row = sqlx::query_as::<_, LessonRow>(
            r#"
            UPDATE lessons
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                preview = COALESCE($3, preview),
                video_url = COALESCE($4, video_url)
            WHERE id = $5
            RETURNING id, course_id, title, description, preview, video_url, owner_id, created_at
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.preview)
        .bind(&update.video_url)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
