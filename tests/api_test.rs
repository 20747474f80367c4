use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use kudos::{
    api,
    config::Settings,
    notifications::{AchievementDisplay, FeedRenderer, MountedDisplay, TokioTimer},
    service::ServiceContext,
};

fn app_with_display() -> (Router, MountedDisplay) {
    let feed = Arc::new(FeedRenderer::new());
    let context = Arc::new(ServiceContext::new(Some(feed.clone())));
    let display = AchievementDisplay::new(
        context.queue.clone(),
        Arc::new(TokioTimer::current()),
        feed,
        Duration::from_secs(5),
    )
    .mount();

    (api::create_app(context, Arc::new(Settings::default())), display)
}

fn app_without_display() -> Router {
    let context = Arc::new(ServiceContext::new(None));
    api::create_app(context, Arc::new(Settings::default()))
}

fn trigger_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/achievements")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn test_trigger_then_current_shows_card() -> anyhow::Result<()> {
    let (app, _display) = app_with_display();

    let response = app
        .clone()
        .oneshot(trigger_request(json!({
            "title": "First Steps",
            "description": "Completed onboarding",
            "points": 10
        })))
        .await?;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await?["status"], "queued");

    let response = app.clone().oneshot(get("/api/achievements/current")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let current = body_json(response).await?;
    assert_eq!(current["state"], "showing");
    assert_eq!(current["card"]["title"], "First Steps");
    assert_eq!(current["card"]["badge"], "+10 pts");
    assert!(current["remaining_ms"].as_u64().unwrap() <= 5000);

    let response = app.oneshot(get("/portal/achievements/toast")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(to_bytes(response.into_body(), usize::MAX).await?.to_vec())?;
    assert!(html.contains("First Steps"));
    assert!(html.contains("+10 pts"));

    Ok(())
}

#[tokio::test]
async fn test_current_is_idle_before_any_trigger() -> anyhow::Result<()> {
    let (app, _display) = app_with_display();

    let response = app.clone().oneshot(get("/api/achievements/current")).await?;
    assert_eq!(body_json(response).await?, json!({ "state": "idle" }));

    let response = app.oneshot(get("/portal/achievements/toast")).await?;
    let html = String::from_utf8(to_bytes(response.into_body(), usize::MAX).await?.to_vec())?;
    assert!(html.trim().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_negative_points_are_rejected() -> anyhow::Result<()> {
    let (app, _display) = app_with_display();

    let response = app
        .oneshot(trigger_request(json!({
            "title": "Oops",
            "description": "",
            "points": -5
        })))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await?["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_without_display_achievements_queue_up() -> anyhow::Result<()> {
    let app = app_without_display();

    for points in [0, 5] {
        let response = app
            .clone()
            .oneshot(trigger_request(json!({ "title": "", "description": "", "points": points })))
            .await?;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    let response = app.clone().oneshot(get("/api/achievements/queue")).await?;
    assert_eq!(body_json(response).await?["queued"], 2);

    let response = app.oneshot(get("/api/achievements/current")).await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_json_404() -> anyhow::Result<()> {
    let app = app_without_display();

    let response = app.oneshot(get("/nope")).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await?["error"], "No such route");

    Ok(())
}
