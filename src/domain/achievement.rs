use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// One unlockable event to announce. Records carry no identity beyond
/// their position in the queue, so identical records are delivered
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub title: String,
    pub description: String,
    pub points: u32,
}

impl AchievementRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>, points: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            points,
        }
    }

    pub fn points_label(&self) -> String {
        format!("+{} pts", self.points)
    }
}

/// The fixed-shape card a render surface draws for a showing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationCard {
    pub title: String,
    pub description: String,
    pub badge: String,
}

impl From<&AchievementRecord> for NotificationCard {
    fn from(record: &AchievementRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            badge: record.points_label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Idle,
    Showing {
        record: AchievementRecord,
        expires_at: Instant,
    },
}

impl DisplayState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DisplayState::Idle)
    }

    pub fn current(&self) -> Option<&AchievementRecord> {
        match self {
            DisplayState::Idle => None,
            DisplayState::Showing { record, .. } => Some(record),
        }
    }
}
