pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // API routes
        .nest("/api", api_routes())

        // Rendered fragments for the app shell
        .merge(crate::web::create_web_routes())

        .fallback(handlers::root::not_found)

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/achievements", achievement_routes())
}

fn achievement_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::achievements::trigger))
        .route("/current", get(handlers::achievements::current))
        .route("/queue", get(handlers::achievements::queue_depth))
}
