use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::ports::SessionServicePort;

/// Extension type to store the authenticated user in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Middleware that resolves the session token on protected routes and
/// adds user info to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // Extract token from Authorization header
    let token = extract_session_token(req.headers()).map_err(|e| e.into_response())?;

    let user = state
        .session_service
        .authenticate(token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Session authentication failed");
            ApiError::from(e).into_response()
        })?;

    // Add authenticated user info to request extensions
    req.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username.to_string(),
    });

    Ok(next.run(req).await)
}

/// Pull the session token out of an `Authorization: Session <token>`
/// header. The scheme is matched case-insensitively; an empty token
/// counts as malformed.
pub fn extract_session_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    let malformed = || {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Session <token>".to_string(),
        )
    };

    let (scheme, token) = auth_str.split_once(' ').ok_or_else(malformed)?;
    if !scheme.eq_ignore_ascii_case("session") || token.is_empty() {
        return Err(malformed());
    }

    Ok(token)
}
