use askama::Template;
use axum::{
    extract::State,
    response::IntoResponse,
};

use crate::{
    api::state::AppState,
    notifications::DisplayedCard,
    web::templates::HtmlTemplate,
};

#[derive(Template)]
#[template(path = "portal/achievement_toast.html")]
pub struct AchievementToastTemplate {
    pub displayed: Option<DisplayedCard>,
}

pub async fn toast(State(state): State<AppState>) -> impl IntoResponse {
    let displayed = state
        .service_context
        .display_feed
        .as_ref()
        .and_then(|feed| feed.current());

    HtmlTemplate(AchievementToastTemplate { displayed })
}
