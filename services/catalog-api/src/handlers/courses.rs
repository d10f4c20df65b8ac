//! Course handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use lyceum_catalog_core::CreateCourseInput;
use lyceum_db::UpdateCourse;
use lyceum_types::CourseId;

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::shared::{
    course_detail_to_response, CourseResponse, PageParams, PageResponse,
};
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /courses - paginated listing
pub async fn list_courses(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PageResponse<CourseResponse>>> {
    let (limit, offset) = params.limit_offset();

    let page = state.catalog.list_courses(&actor, limit, offset).await?;

    Ok(Json(PageResponse {
        count: page.total,
        page: params.page(),
        page_size: limit,
        results: page
            .items
            .into_iter()
            .map(course_detail_to_response)
            .collect(),
    }))
}

/// POST /courses
#[instrument(skip(state, req), fields(user_id = %actor.user_id))]
pub async fn create_course(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(req): Json<CreateCourseRequest>,
) -> ApiResult<(StatusCode, Json<CourseResponse>)> {
    let row = state
        .catalog
        .create_course(
            &actor,
            CreateCourseInput {
                title: req.title,
                description: req.description,
                preview: req.preview,
            },
        )
        .await?;

    let detail = state.catalog.get_course(&actor, CourseId(row.id)).await?;

    Ok((StatusCode::CREATED, Json(course_detail_to_response(detail))))
}

/// GET /courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CourseResponse>> {
    let detail = state.catalog.get_course(&actor, CourseId(id)).await?;

    Ok(Json(course_detail_to_response(detail)))
}

/// PUT /courses/{id}
#[instrument(skip(state, req), fields(user_id = %actor.user_id, course_id = %id))]
pub async fn update_course(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCourseRequest>,
) -> ApiResult<Json<CourseResponse>> {
    let start = Instant::now();

    let outcome = state
        .catalog
        .update_course(
            &actor,
            CourseId(id),
            UpdateCourse {
                title: req.title,
                description: req.description,
                preview: req.preview,
            },
        )
        .await?;

    if outcome.notified {
        metrics::counter!("course_update_notifications_total").increment(1);
    }
    metrics::histogram!("catalog_operation_duration_seconds", "operation" => "update_course")
        .record(start.elapsed().as_secs_f64());

    let detail = state.catalog.get_course(&actor, CourseId(id)).await?;

    Ok(Json(course_detail_to_response(detail)))
}

/// DELETE /courses/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id, course_id = %id))]
pub async fn delete_course(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_course(&actor, CourseId(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
