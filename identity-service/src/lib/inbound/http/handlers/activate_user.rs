use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::CredentialStorePort;
use crate::inbound::http::router::AppState;

pub async fn activate_user<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Path(key): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    if state.store.activate_user(&key).await? {
        Ok(ApiSuccess::new(StatusCode::OK, ()))
    } else {
        Err(ApiError::NotFound("Unknown activation key".to_string()))
    }
}
