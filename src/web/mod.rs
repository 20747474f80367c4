pub mod templates;
pub mod portal;

use axum::Router;
use crate::api::state::AppState;

pub fn create_web_routes() -> Router<AppState> {
    Router::new()
        .nest("/portal", portal::create_portal_routes())
}
