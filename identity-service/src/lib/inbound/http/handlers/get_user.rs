use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::find_user;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::CredentialStorePort;
use crate::inbound::http::router::AppState;

pub async fn get_user<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    find_user(state.store.as_ref(), &user_id)
        .await
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
