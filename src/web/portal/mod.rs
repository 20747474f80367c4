mod achievements;

use axum::{
    Router,
    routing::get,
};
use crate::api::state::AppState;

pub fn create_portal_routes() -> Router<AppState> {
    Router::new()
        // Polled by the app shell; renders the visible card or nothing
        .route("/achievements/toast", get(achievements::toast))
}
