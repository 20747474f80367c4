use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use fake::{
    faker::lorem::en::{Sentence, Words},
    Fake,
};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kudos::{
    notifications::{AchievementDisplay, TokioTimer, TracingRenderer},
    service::ServiceContext,
};

#[derive(Parser)]
#[command(name = "announce", about = "Send achievement notifications")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Post one achievement to a running server
    Send {
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        server: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 10)]
        points: u32,
    },
    /// Post a burst of generated achievements to a running server
    Random {
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        server: String,
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Run the two-achievement walkthrough in-process and log the cards
    Demo {
        #[arg(long, default_value_t = 5)]
        dwell_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kudos=info,announce=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Command::Send { server, title, description, points } => {
            let client = reqwest::Client::new();
            post(&client, &server, &title, &description, points).await?;
            println!("🏆 Sent \"{}\" (+{} pts)", title, points);
        }
        Command::Random { server, count } => {
            let client = reqwest::Client::new();
            for _ in 0..count {
                let words: Vec<String> = Words(1..4).fake();
                let title = words.join(" ");
                let description: String = Sentence(3..8).fake();
                let points: u32 = (5u32..100u32).fake();
                post(&client, &server, &title, &description, points).await?;
                println!("🏆 Sent \"{}\" (+{} pts)", title, points);
            }
        }
        Command::Demo { dwell_secs } => demo(Duration::from_secs(dwell_secs)).await,
    }

    Ok(())
}

async fn post(
    client: &reqwest::Client,
    server: &str,
    title: &str,
    description: &str,
    points: u32,
) -> anyhow::Result<()> {
    client
        .post(format!("{}/api/achievements", server.trim_end_matches('/')))
        .json(&json!({
            "title": title,
            "description": description,
            "points": points,
        }))
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

async fn demo(dwell: Duration) {
    let context = ServiceContext::new(None);
    let display = AchievementDisplay::new(
        context.queue.clone(),
        Arc::new(TokioTimer::current()),
        Arc::new(TracingRenderer),
        dwell,
    )
    .mount();

    let service = &context.achievement_service;
    service.trigger_achievement("First Steps", "Completed onboarding", 10);
    service.trigger_achievement("Quick Learner", "Finished first module", 20);

    while !(display.is_idle() && display.pending_len() == 0 && context.queue.is_empty()) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    display.unmount();
    println!("✅ All achievements delivered");
}
