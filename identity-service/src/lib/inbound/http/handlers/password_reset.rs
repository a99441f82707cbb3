use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::ports::CredentialStorePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordResetResponseData {
    pub reset_key: String,
}

/// Issue a reset key for the account. The key is returned to the caller,
/// which is expected to deliver it out of band.
pub async fn request_password_reset<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<ApiSuccess<PasswordResetResponseData>, ApiError> {
    let email = EmailAddress::new(body.email).map_err(UserError::from)?;

    state
        .store
        .reset_password(&email)
        .await
        .map_err(ApiError::from)
        .map(|reset_key| {
            ApiSuccess::new(StatusCode::CREATED, PasswordResetResponseData { reset_key })
        })
}

#[derive(Debug, Deserialize)]
pub struct CompletePasswordResetRequest {
    pub new_password: String,
}

pub async fn complete_password_reset<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Path(key): Path<String>,
    Json(body): Json<CompletePasswordResetRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    if state
        .store
        .complete_password_reset(&key, &body.new_password)
        .await?
    {
        Ok(ApiSuccess::new(StatusCode::OK, ()))
    } else {
        Err(ApiError::NotFound("Unknown password reset key".to_string()))
    }
}
