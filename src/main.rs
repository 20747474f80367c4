use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kudos::{
    api,
    config::Settings,
    notifications::{AchievementDisplay, FeedRenderer, TokioTimer},
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kudos=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting Kudos server on {}:{}", settings.server.host, settings.server.port);

    let feed = settings
        .notifications
        .display_enabled
        .then(|| Arc::new(FeedRenderer::new()));

    let service_context = Arc::new(ServiceContext::new(feed.clone()));

    // Mount the single achievement display near the root; it lives as long
    // as the server does.
    let _display = match feed {
        Some(feed) => {
            let display = AchievementDisplay::new(
                service_context.queue.clone(),
                Arc::new(TokioTimer::current()),
                feed,
                settings.notifications.dwell(),
            );
            Some(display.mount())
        }
        None => {
            tracing::info!("Achievement display disabled; achievements will queue");
            None
        }
    };

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on {}", settings.server.base_url);

    axum::serve(listener, app).await?;

    Ok(())
}
