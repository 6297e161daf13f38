use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::SessionServicePort;
use crate::inbound::http::middleware::extract_session_token;
use crate::inbound::http::router::AppState;

/// Ends the session named by the credential header. Runs outside the
/// session middleware: signing out must work whether or not the session
/// is still marked active.
pub async fn signout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<SignoutResponseData>, ApiError> {
    let token = extract_session_token(&headers)?;

    state
        .session_service
        .signout(token)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                SignoutResponseData {
                    message: "Signed out".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignoutResponseData {
    pub message: String,
}
