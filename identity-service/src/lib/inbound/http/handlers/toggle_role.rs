use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::find_user;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::Role;
use crate::domain::user::ports::CredentialStorePort;
use crate::inbound::http::router::AppState;

pub async fn toggle_admin<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    toggle(state, id, Role::Admin).await
}

pub async fn toggle_editor<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    toggle(state, id, Role::Editor).await
}

/// Flip `role` and answer with the user as stored afterwards.
async fn toggle<S: CredentialStorePort>(
    state: AppState<S>,
    id: String,
    role: Role,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user = find_user(state.store.as_ref(), &id).await?;

    match role {
        Role::Admin => state.store.toggle_admin(&user.email).await?,
        Role::Editor => state.store.toggle_editor(&user.email).await?,
    }

    find_user(state.store.as_ref(), &id)
        .await
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
