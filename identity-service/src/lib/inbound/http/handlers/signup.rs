use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialStorePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    email: String,
    username: String,
    password: String,
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
}

impl SignupRequest {
    fn try_into_command(self) -> Result<SignupCommand, UserError> {
        Ok(SignupCommand {
            email: EmailAddress::new(self.email)?,
            username: Username::new(self.username)?,
            password: Password::new(self.password)?,
            firstname: self.firstname,
            lastname: self.lastname,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupResponseData {
    pub activation_key: String,
}

pub async fn signup<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<SignupRequest>,
) -> Result<ApiSuccess<SignupResponseData>, ApiError> {
    state
        .store
        .signup(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|activation_key| {
            ApiSuccess::new(StatusCode::CREATED, SignupResponseData { activation_key })
        })
}
