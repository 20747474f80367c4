use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use super::channel::DeliveryChannel;
use crate::domain::AchievementRecord;

/// Process-wide FIFO of achievements waiting for a display. Created once
/// at startup and shared by every producer and the single consumer.
pub struct AnnouncementQueue {
    records: Mutex<VecDeque<AchievementRecord>>,
    channel: Arc<DeliveryChannel>,
}

impl AnnouncementQueue {
    pub fn new(channel: Arc<DeliveryChannel>) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            channel,
        }
    }

    /// Append a record at the tail and tell subscribers the queue changed.
    pub fn enqueue(&self, record: AchievementRecord) {
        let queued = {
            let mut records = self.records.lock();
            records.push_back(record);
            records.len()
        };
        tracing::debug!("Achievement queued ({} waiting)", queued);

        self.channel.notify();
    }

    /// Remove and return every buffered record in insertion order.
    pub fn drain_all(&self) -> Vec<AchievementRecord> {
        let mut records = self.records.lock();
        records.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn channel(&self) -> &Arc<DeliveryChannel> {
        &self.channel
    }
}
