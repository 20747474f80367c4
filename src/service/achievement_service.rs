use std::sync::Arc;

use crate::{domain::AchievementRecord, notifications::AnnouncementQueue};

/// Producer-facing entry point. Cheap to clone into any part of the app
/// that awards points.
#[derive(Clone)]
pub struct AchievementService {
    queue: Arc<AnnouncementQueue>,
}

impl AchievementService {
    pub fn new(queue: Arc<AnnouncementQueue>) -> Self {
        Self { queue }
    }

    /// Announce an achievement. Fire-and-forget; the display picks it up
    /// in trigger order.
    pub fn trigger_achievement(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        points: u32,
    ) {
        let record = AchievementRecord::new(title, description, points);
        tracing::debug!("Achievement triggered: {} (+{})", record.title, record.points);
        self.queue.enqueue(record);
    }

    /// Records not yet picked up by a display.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}
