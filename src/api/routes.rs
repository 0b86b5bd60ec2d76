use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// Recommendation routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/outfits", post(handlers::generate_outfits))
        .route(
            "/users/:user_id/outfits/weather",
            post(handlers::generate_weather_outfits),
        )
        .route(
            "/users/:user_id/outfits/events/:event",
            get(handlers::event_outfits),
        )
}
