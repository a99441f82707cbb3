use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::AddUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialStorePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::PasswordError;
use crate::user::errors::UsernameError;

pub async fn add_user<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<AddUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .store
        .add_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for adding an active user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddUserRequest {
    email: String,
    username: String,
    password: String,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    is_editor: bool,
}

#[derive(Debug, Clone, Error)]
enum ParseAddUserRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordError),
}

impl AddUserRequest {
    fn try_into_command(self) -> Result<AddUserCommand, ParseAddUserRequestError> {
        let email = EmailAddress::new(self.email)?;
        let username = Username::new(self.username)?;
        let password = Password::new(self.password)?;
        Ok(AddUserCommand::new(
            email,
            username,
            password,
            self.is_admin,
            self.is_editor,
        ))
    }
}

impl From<ParseAddUserRequestError> for ApiError {
    fn from(err: ParseAddUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
