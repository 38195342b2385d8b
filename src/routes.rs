use crate::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Builds the HTTP router with all lookup endpoints and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.body_limit_bytes;

    let lookup_routes = Router::new()
        .route("/api/v1/user-lookup", post(handlers::user_lookup))
        .route("/api/v1/vehicle-lookup", post(handlers::vehicle_lookup))
        .route("/api/v1/search", post(handlers::search))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(body_limit)));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(lookup_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
