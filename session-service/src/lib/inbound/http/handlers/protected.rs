use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Example protected resource. The session middleware has already
/// resolved the token to a user by the time this runs.
pub async fn protected(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ProtectedResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        ProtectedResponseData {
            message: format!("Hello {}, you are signed in.", user.username),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectedResponseData {
    pub message: String,
}
