use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_task::create_task;
use super::handlers::current_user::current_user;
use super::handlers::delete_task::delete_task;
use super::handlers::get_task::get_task;
use super::handlers::health::health;
use super::handlers::list_tasks::list_tasks;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::handlers::update_task::update_task;
use super::handlers::ApiError;
use crate::domain::task::ports::TaskServicePort;
use crate::domain::user::ports::AuthServicePort;

/// Shared handler state.
///
/// Services sit behind their ports so the same router serves the Postgres
/// and the in-memory wiring.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub task_service: Arc<dyn TaskServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    task_service: Arc<dyn TaskServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        auth_service,
        task_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in));

    // Protected by the `AuthenticatedUser` extractor each handler takes.
    let protected_routes = Router::new()
        .route("/auth/me", get(current_user))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:task_id",
            get(get_task).patch(update_task).delete(delete_task),
        );

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
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
