//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{AppState, Error, dashboard::post_dashboard, endpoints, logging::logging_middleware};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::DASHBOARD_API, post(post_dashboard))
        .route(endpoints::HEALTH, get(get_health))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Liveness probe.
async fn get_health() -> StatusCode {
    StatusCode::OK
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
