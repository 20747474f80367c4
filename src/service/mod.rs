pub mod achievement_service;

use std::sync::Arc;
use crate::notifications::{AnnouncementQueue, DeliveryChannel, FeedRenderer};
use achievement_service::AchievementService;

pub struct ServiceContext {
    pub channel: Arc<DeliveryChannel>,
    pub queue: Arc<AnnouncementQueue>,
    pub achievement_service: AchievementService,
    /// Present when a display is mounted and rendering into the feed.
    pub display_feed: Option<Arc<FeedRenderer>>,
}

impl ServiceContext {
    pub fn new(display_feed: Option<Arc<FeedRenderer>>) -> Self {
        let channel = Arc::new(DeliveryChannel::new());
        let queue = Arc::new(AnnouncementQueue::new(channel.clone()));
        let achievement_service = AchievementService::new(queue.clone());

        Self {
            channel,
            queue,
            achievement_service,
            display_feed,
        }
    }
}
