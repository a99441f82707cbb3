use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::CredentialStorePort;

/// HTTP request body for replacing a user's identity (raw JSON).
///
/// PUT replaces the whole record: an absent or null name is stored as cleared.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self, id: &str) -> Result<UpdateUserCommand, UserError> {
        Ok(UpdateUserCommand {
            id: UserId::from_string(id)?,
            email: EmailAddress::new(self.email)?,
            username: Username::new(self.username)?,
            firstname: self.firstname,
            lastname: self.lastname,
        })
    }
}

pub async fn update_user<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = req.try_into_command(&id)?;

    // The store reads and writes the record under its lock
    state
        .store
        .update_user(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
