//! Account handlers (register, login, token refresh, profile)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lyceum_auth_core::{hash_password, verify_password};
use lyceum_db::{CreateUser, DbError, PaymentFilter, PaymentRepository, UpdateUser, UserRepository};
use lyceum_types::UserId;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::handlers::shared::{payment_to_response, PaymentResponse};
use crate::state::AppState;

const MIN_PASSWORD_LENGTH: usize = 8;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub role: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub payments: Vec<PaymentResponse>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub phone: Option<String>,
    pub city: Option<String>,
}

fn user_to_response(user: lyceum_db::UserRow) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        email: user.email,
        phone: user.phone,
        city: user.city,
        role: user.role,
        is_active: user.is_active,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    if !req.email.contains('@') {
        return Err(ApiError::Validation {
            field: "email",
            message: "enter a valid email address".to_string(),
        });
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::Validation {
            field: "password",
            message: format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
        });
    }

    let password_hash = hash_password(&req.password)?;

    let row = state
        .repos
        .users
        .create(CreateUser {
            id: UserId::new().0,
            email: req.email,
            password_hash,
            phone: req.phone,
            city: req.city,
            role: "user".to_string(),
        })
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation => ApiError::Validation {
                field: "email",
                message: "a user with this email already exists".to_string(),
            },
            other => ApiError::Database(other),
        })?;

    tracing::info!(user_id = %row.id, "User registered");
    metrics::counter!("users_registered_total").increment(1);

    Ok((StatusCode::CREATED, Json(user_to_response(row))))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    let user = state
        .repos
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".to_string()))?;

    if !user.is_active || !verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized("invalid credentials".to_string()));
    }

    let role = user
        .role
        .parse()
        .map_err(|_| ApiError::Internal(format!("unknown role for user {}", user.id)))?;

    state
        .repos
        .users
        .update_last_login(user.id, Utc::now())
        .await?;

    let pair = state
        .tokens
        .issue_pair(UserId(user.id), &user.email, role)?;

    Ok(Json(TokenPairResponse {
        access: pair.access_token,
        refresh: pair.refresh_token,
    }))
}

/// POST /users/token/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let access = state.tokens.refresh_access(&req.refresh)?;

    Ok(Json(AccessTokenResponse { access }))
}

/// GET /users/{id} - profile with embedded payment history.
/// Visible to the account itself and to moderators.
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProfileResponse>> {
    if actor.user_id.0 != id && !actor.is_moderator() {
        return Err(ApiError::Forbidden("not your profile".to_string()));
    }

    let user = state
        .repos
        .users
        .find_by_id(id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    let payments = state
        .repos
        .payments
        .list_by_user(user.id, PaymentFilter::default())
        .await?;

    Ok(Json(ProfileResponse {
        user: user_to_response(user),
        payments: payments.into_iter().map(payment_to_response).collect(),
    }))
}

/// PUT /users/{id}/update - self only
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    if actor.user_id.0 != id {
        return Err(ApiError::Forbidden("not your profile".to_string()));
    }

    let row = state
        .repos
        .users
        .update(
            id,
            UpdateUser {
                phone: req.phone,
                city: req.city,
            },
        )
        .await
        .map_err(|e| match e {
            DbError::NotFound => ApiError::UserNotFound,
            other => ApiError::Database(other),
        })?;

    Ok(Json(user_to_response(row)))
}

/// DELETE /users/{id}/delete - self only
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if actor.user_id.0 != id {
        return Err(ApiError::Forbidden("not your profile".to_string()));
    }

    state.repos.users.delete(id).await?;
    tracing::info!(user_id = %id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
