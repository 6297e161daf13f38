use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Session;
use crate::domain::user::ports::SessionServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::AuthError;
use crate::user::models::Username;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A username that fails validation cannot belong to any account, so
    // it collapses into the same error as unknown-user/wrong-password.
    let username = Username::new(body.username)
        .map_err(|_| ApiError::from(AuthError::InvalidCredentials))?;

    state
        .session_service
        .login(&username, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&Session> for LoginResponseData {
    fn from(session: &Session) -> Self {
        Self {
            session_token: session.token.clone(),
            expires_at: session.expires_at,
        }
    }
}
