use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::CredentialStorePort;
use crate::inbound::http::router::AppState;
use crate::user::models::EmailAddress;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn authenticate<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<AuthenticateRequestBody>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    // A malformed email cannot belong to anyone
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !state.store.authenticate(&email, &body.password).await? {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let user = state
        .store
        .get_user(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    Ok(ApiSuccess::new(StatusCode::OK, (&user).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequestBody {
    email: String,
    password: String,
}
