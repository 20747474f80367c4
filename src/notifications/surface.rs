use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::domain::NotificationCard;

/// Host capability to put a notification card on screen and take it down.
/// Calls arrive one at a time in display order, outside the display's
/// state lock, so an implementation may trigger further achievements.
pub trait Renderer: Send + Sync {
    fn show(&self, card: &NotificationCard, expires_at: Instant);
    fn clear(&self);
}

/// Writes cards to the log. Used by the CLI demo.
#[derive(Debug, Default)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn show(&self, card: &NotificationCard, expires_at: Instant) {
        let remaining = expires_at.saturating_duration_since(Instant::now());
        tracing::info!(
            "🏆 {} ({}) {} [{}s]",
            card.title,
            card.badge,
            card.description,
            remaining.as_secs()
        );
    }

    fn clear(&self) {
        tracing::info!("Achievement notification dismissed");
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayedCard {
    #[serde(flatten)]
    pub card: NotificationCard,
    pub shown_at: DateTime<Utc>,
    #[serde(skip)]
    pub expires_at: Instant,
}

impl DisplayedCard {
    pub fn remaining_ms(&self) -> u64 {
        let remaining = self.expires_at.saturating_duration_since(Instant::now());
        u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Publishes the visible card on a watch channel so the web layer can
/// read it.
pub struct FeedRenderer {
    sender: watch::Sender<Option<DisplayedCard>>,
}

impl FeedRenderer {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<DisplayedCard>> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Option<DisplayedCard> {
        self.sender.borrow().clone()
    }
}

impl Default for FeedRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for FeedRenderer {
    fn show(&self, card: &NotificationCard, expires_at: Instant) {
        tracing::info!("Showing achievement: {} ({})", card.title, card.badge);
        self.sender.send_replace(Some(DisplayedCard {
            card: card.clone(),
            shown_at: Utc::now(),
            expires_at,
        }));
    }

    fn clear(&self) {
        if self.sender.send_replace(None).is_some() {
            tracing::debug!("Achievement card cleared");
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use recording::{RecordingRenderer, RenderEvent};

#[cfg(any(test, feature = "test-utils"))]
mod recording {
    use super::*;
    use crate::notifications::timer::Timer;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RenderEvent {
        Shown { card: NotificationCard, at: Instant, expires_at: Instant },
        Cleared { at: Instant },
    }

    /// Keeps every show/clear call for later assertions.
    #[derive(Default)]
    pub struct RecordingRenderer {
        events: Mutex<Vec<RenderEvent>>,
        clock: Option<Arc<dyn Timer>>,
    }

    impl RecordingRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Stamp events with this timer's clock instead of tokio's.
        pub fn with_clock(clock: Arc<dyn Timer>) -> Self {
            Self {
                events: Mutex::new(Vec::new()),
                clock: Some(clock),
            }
        }

        pub fn events(&self) -> Vec<RenderEvent> {
            self.events.lock().clone()
        }

        pub fn shown_titles(&self) -> Vec<String> {
            self.events
                .lock()
                .iter()
                .filter_map(|event| match event {
                    RenderEvent::Shown { card, .. } => Some(card.title.clone()),
                    RenderEvent::Cleared { .. } => None,
                })
                .collect()
        }

        fn now(&self) -> Instant {
            match &self.clock {
                Some(clock) => clock.now(),
                None => Instant::now(),
            }
        }
    }

    impl Renderer for RecordingRenderer {
        fn show(&self, card: &NotificationCard, expires_at: Instant) {
            let at = self.now();
            self.events.lock().push(RenderEvent::Shown {
                card: card.clone(),
                at,
                expires_at,
            });
        }

        fn clear(&self) {
            let at = self.now();
            self.events.lock().push(RenderEvent::Cleared { at });
        }
    }
}
