//! Payment handlers

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use lyceum_billing_core::CreatePaymentRequest as CreatePaymentInput;
use lyceum_db::{DateOrder, PaymentFilter};
use lyceum_types::{CourseId, LessonId, PaymentMethod};

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::handlers::shared::{payment_to_response, PaymentResponse};
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub paid_course: Option<Uuid>,
    pub paid_lesson: Option<Uuid>,
    pub amount: i64,
    pub payment_method: String,
}

#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    pub paid_course: Option<Uuid>,
    pub paid_lesson: Option<Uuid>,
    pub payment_method: Option<String>,
    /// `date` (ascending, the default) or `-date` (descending)
    pub ordering: Option<String>,
}

fn parse_method(raw: &str) -> Result<PaymentMethod, ApiError> {
    raw.parse().map_err(|_| ApiError::Validation {
        field: "payment_method",
        message: format!("unknown payment method: {raw}"),
    })
}

fn parse_ordering(raw: Option<&str>) -> Result<DateOrder, ApiError> {
    match raw {
        None | Some("date") => Ok(DateOrder::Asc),
        Some("-date") => Ok(DateOrder::Desc),
        Some(other) => Err(ApiError::Validation {
            field: "ordering",
            message: format!("unsupported ordering: {other}"),
        }),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /users/payments/create
///
/// Persists the payment and drives the gateway checkout chain; on gateway
/// failure the payment row is kept and a 502 is returned.
#[instrument(skip(state, req), fields(user_id = %actor.user_id))]
pub async fn create_payment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(req): Json<CreatePaymentRequest>,
) -> ApiResult<(StatusCode, Json<PaymentResponse>)> {
    let start = Instant::now();

    let payment_method = parse_method(&req.payment_method)?;

    let row = state
        .payments
        .create_payment(
            &actor,
            CreatePaymentInput {
                paid_course_id: req.paid_course.map(CourseId),
                paid_lesson_id: req.paid_lesson.map(LessonId),
                amount: req.amount,
                payment_method,
            },
        )
        .await?;

    metrics::counter!("payments_checkouts_created_total").increment(1);
    metrics::histogram!("catalog_operation_duration_seconds", "operation" => "create_payment")
        .record(start.elapsed().as_secs_f64());

    Ok((StatusCode::CREATED, Json(payment_to_response(row))))
}

/// GET /users/payments
///
/// The caller's payment history, filterable by paid course/lesson and
/// method, sortable by date.
pub async fn list_payments(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(query): Query<ListPaymentsQuery>,
) -> ApiResult<Json<Vec<PaymentResponse>>> {
    let payment_method = query
        .payment_method
        .as_deref()
        .map(parse_method)
        .transpose()?
        .map(|m| m.to_string());

    let filter = PaymentFilter {
        paid_course_id: query.paid_course,
        paid_lesson_id: query.paid_lesson,
        payment_method,
        order: parse_ordering(query.ordering.as_deref())?,
    };

    let rows = state.payments.list_payments(&actor, filter).await?;

    Ok(Json(rows.into_iter().map(payment_to_response).collect()))
}
