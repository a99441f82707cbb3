use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::Role;
use crate::domain::user::ports::CredentialStorePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleFilter {
    Admin,
    Editor,
}

impl From<RoleFilter> for Role {
    fn from(filter: RoleFilter) -> Self {
        match filter {
            RoleFilter::Admin => Role::Admin,
            RoleFilter::Editor => Role::Editor,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    role: Option<RoleFilter>,
}

pub async fn list_users<S: CredentialStorePort>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    let users = match query.role.map(Role::from) {
        Some(Role::Admin) => state.store.list_admins().await?,
        Some(Role::Editor) => state.store.list_editors().await?,
        None => state.store.list_users().await?,
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        users.iter().map(UserData::from).collect(),
    ))
}
