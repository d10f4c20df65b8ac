//! Axum extractors for authentication

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use lyceum_types::Actor;

use crate::state::AppState;

/// Authenticated user extracted from a Bearer access token
#[derive(Debug, Clone)]
pub struct AuthUser(pub Actor);

/// Error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: AuthErrorDetail,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetail {
    code: &'static str,
    message: &'static str,
}

/// Auth rejection type
pub struct AuthRejection {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            error: AuthErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = extract_bearer_token(parts)?;

        let claims = app_state.tokens.validate_access(&token).map_err(|e| {
            tracing::debug!(error = ?e, "Token validation failed");
            AuthRejection {
                status: StatusCode::UNAUTHORIZED,
                code: "INVALID_TOKEN",
                message: "Invalid or expired token",
            }
        })?;

        let user_id = claims.user_id().map_err(|_| AuthRejection {
            status: StatusCode::UNAUTHORIZED,
            code: "INVALID_TOKEN",
            message: "Invalid or expired token",
        })?;

        Ok(AuthUser(Actor {
            user_id,
            email: claims.email,
            role: claims.role,
        }))
    }
}

/// Extract a Bearer token from the Authorization header
fn extract_bearer_token(parts: &Parts) -> Result<String, AuthRejection> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthRejection {
            status: StatusCode::UNAUTHORIZED,
            code: "MISSING_TOKEN",
            message: "No authentication token provided",
        })?;

    let auth_str = auth_header.to_str().map_err(|_| AuthRejection {
        status: StatusCode::BAD_REQUEST,
        code: "INVALID_HEADER",
        message: "Invalid Authorization header encoding",
    })?;

    auth_str
        .strip_prefix("Bearer ")
        .map(String::from)
        .ok_or(AuthRejection {
            status: StatusCode::UNAUTHORIZED,
            code: "MISSING_TOKEN",
            message: "No authentication token provided",
        })
}
