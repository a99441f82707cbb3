use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::find_user;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::CredentialStorePort;

pub async fn delete_user<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let user = find_user(state.store.as_ref(), &id).await?;

    if state.store.delete_user(&user.email).await? {
        Ok(ApiSuccess::new(StatusCode::OK, ()))
    } else {
        // Removed concurrently between lookup and delete
        Err(UserError::NotFound(id).into())
    }
}
