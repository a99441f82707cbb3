use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::activate_user::activate_user;
use super::handlers::add_user::add_user;
use super::handlers::authenticate::authenticate;
use super::handlers::change_password::change_password;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::password_reset::complete_password_reset;
use super::handlers::password_reset::request_password_reset;
use super::handlers::signup::signup;
use super::handlers::toggle_role::toggle_admin;
use super::handlers::toggle_role::toggle_editor;
use super::handlers::update_user::update_user;
use super::middleware::require_api_key;
use super::middleware::ApiKey;
use crate::domain::user::ports::CredentialStorePort;

pub struct AppState<S: CredentialStorePort> {
    pub store: Arc<S>,
}

// Derived Clone would require `S: Clone`.
impl<S: CredentialStorePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

pub fn create_router<S: CredentialStorePort>(store: Arc<S>, api_key: String) -> Router {
    let state = AppState { store };

    let user_routes = Router::new()
        .route("/api/users", get(list_users::<S>).post(add_user::<S>))
        .route(
            "/api/users/:user_id",
            get(get_user::<S>)
                .put(update_user::<S>)
                .delete(delete_user::<S>),
        )
        .route("/api/users/:user_id/password", post(change_password::<S>))
        .route("/api/users/:user_id/toggle-admin", post(toggle_admin::<S>))
        .route("/api/users/:user_id/toggle-editor", post(toggle_editor::<S>));

    let credential_routes = Router::new()
        .route("/api/auth/authenticate", post(authenticate::<S>))
        .route("/api/password-resets", post(request_password_reset::<S>))
        .route(
            "/api/password-resets/:key",
            post(complete_password_reset::<S>),
        )
        .route("/api/signup", post(signup::<S>))
        .route("/api/activations/:key", post(activate_user::<S>));

    // Headers are left out of the span: every request carries the API key.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(user_routes)
        .merge(credential_routes)
        .route_layer(middleware::from_fn_with_state(
            ApiKey::new(api_key),
            require_api_key,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
