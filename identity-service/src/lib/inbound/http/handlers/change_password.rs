use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::find_user;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::CredentialStorePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// With `current_password` the change is verified against the stored hash;
/// without it the password is overwritten (administrative reset).
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: String,
}

pub async fn change_password<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let user = find_user(state.store.as_ref(), &id).await?;

    let changed = match body.current_password {
        Some(ref current) => {
            let verified = state
                .store
                .change_password_verified(&user.email, current, &body.new_password)
                .await?;
            if !verified {
                return Err(ApiError::Unauthorized(
                    "Current password is incorrect".to_string(),
                ));
            }
            verified
        }
        None => {
            state
                .store
                .change_password(&user.email, &body.new_password)
                .await?
        }
    };

    if changed {
        Ok(ApiSuccess::new(StatusCode::OK, ()))
    } else {
        Err(UserError::NotFound(id).into())
    }
}
