//! Subscription toggle handler

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use lyceum_types::{CourseId, SubscriptionChange};

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleSubscriptionRequest {
    pub course_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ToggleSubscriptionResponse {
    pub message: &'static str,
}

/// POST /subscription
///
/// Flips the caller's subscription to the given course and reports which
/// way it went.
#[instrument(skip(state), fields(user_id = %actor.user_id, course_id = %req.course_id))]
pub async fn toggle_subscription(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(req): Json<ToggleSubscriptionRequest>,
) -> ApiResult<Json<ToggleSubscriptionResponse>> {
    let change = state
        .catalog
        .toggle_subscription(&actor, CourseId(req.course_id))
        .await?;

    metrics::counter!("subscriptions_toggled_total").increment(1);

    let message = match change {
        SubscriptionChange::Added => "Подписка добавлена",
        SubscriptionChange::Removed => "Подписка удалена",
    };

    Ok(Json(ToggleSubscriptionResponse { message }))
}
