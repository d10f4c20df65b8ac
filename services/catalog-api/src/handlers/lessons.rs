//! Lesson handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use lyceum_catalog_core::CreateLessonInput;
use lyceum_db::UpdateLesson;
use lyceum_types::{CourseId, LessonId};

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::shared::{lesson_to_response, LessonResponse, PageParams, PageResponse};
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateLessonRequest {
    pub course: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview: Option<String>,
    pub video_url: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /lessons/create
#[instrument(skip(state, req), fields(user_id = %actor.user_id))]
pub async fn create_lesson(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(req): Json<CreateLessonRequest>,
) -> ApiResult<(StatusCode, Json<LessonResponse>)> {
    let row = state
        .catalog
        .create_lesson(
            &actor,
            CreateLessonInput {
                course_id: CourseId(req.course),
                title: req.title,
                description: req.description,
                preview: req.preview,
                video_url: req.video_url,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(lesson_to_response(row))))
}

/// GET /lessons - paginated listing
pub async fn list_lessons(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PageResponse<LessonResponse>>> {
    let (limit, offset) = params.limit_offset();

    let page = state.catalog.list_lessons(&actor, limit, offset).await?;

    Ok(Json(PageResponse {
        count: page.total,
        page: params.page(),
        page_size: limit,
        results: page.items.into_iter().map(lesson_to_response).collect(),
    }))
}

/// GET /lessons/{id}
pub async fn get_lesson(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LessonResponse>> {
    let row = state.catalog.get_lesson(&actor, LessonId(id)).await?;

    Ok(Json(lesson_to_response(row)))
}

/// PUT /lessons/{id}/update
#[instrument(skip(state, req), fields(user_id = %actor.user_id, lesson_id = %id))]
pub async fn update_lesson(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateLessonRequest>,
) -> ApiResult<Json<LessonResponse>> {
    let outcome = state
        .catalog
        .update_lesson(
            &actor,
            LessonId(id),
            UpdateLesson {
                title: req.title,
                description: req.description,
                preview: req.preview,
                video_url: req.video_url,
            },
        )
        .await?;

    if outcome.notified {
        metrics::counter!("course_update_notifications_total").increment(1);
    }

    Ok(Json(lesson_to_response(outcome.lesson)))
}

/// DELETE /lessons/{id}/delete
#[instrument(skip(state), fields(user_id = %actor.user_id, lesson_id = %id))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_lesson(&actor, LessonId(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
