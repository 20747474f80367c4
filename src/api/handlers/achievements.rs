use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    api::state::AppState,
    domain::NotificationCard,
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct TriggerAchievementRequest {
    pub title: String,
    pub description: String,
    pub points: u32,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CurrentNotification {
    Idle,
    Showing {
        card: NotificationCard,
        shown_at: chrono::DateTime<chrono::Utc>,
        remaining_ms: u64,
    },
}

pub async fn trigger(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TriggerAchievementRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let Json(request) = payload?;

    state.service_context.achievement_service.trigger_achievement(
        request.title,
        request.description,
        request.points,
    );

    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "queued" }))))
}

pub async fn current(State(state): State<AppState>) -> Result<Json<CurrentNotification>> {
    let feed = state
        .service_context
        .display_feed
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Achievement display is disabled".to_string()))?;

    let current = match feed.current() {
        Some(displayed) => CurrentNotification::Showing {
            remaining_ms: displayed.remaining_ms(),
            shown_at: displayed.shown_at,
            card: displayed.card,
        },
        None => CurrentNotification::Idle,
    };

    Ok(Json(current))
}

pub async fn queue_depth(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "queued": state.service_context.achievement_service.queued(),
    }))
}
