use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::{AchievementRecord, DisplayState};

/// Longest a card may stay up. Longer dwells are clamped to this.
pub const MAX_DWELL: Duration = Duration::from_secs(24 * 60 * 60);

/// A record that has just become the visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shown {
    pub record: AchievementRecord,
    pub expires_at: Instant,
    pub ticket: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expiry {
    /// The showing record was discarded; the machine is idle again.
    Expired(AchievementRecord),
    /// The timer fired before the deadline; nothing changed.
    Early(Duration),
    /// The ticket belongs to a showing that no longer exists.
    Stale,
}

/// Display state machine. Time is always passed in so transitions stay
/// deterministic; the caller owns the timer.
#[derive(Debug)]
pub struct DisplayMachine {
    state: DisplayState,
    pending: VecDeque<AchievementRecord>,
    dwell: Duration,
    ticket: u64,
    torn_down: bool,
}

impl DisplayMachine {
    pub fn new(dwell: Duration) -> Self {
        Self {
            state: DisplayState::Idle,
            pending: VecDeque::new(),
            dwell: dwell.min(MAX_DWELL),
            ticket: 0,
            torn_down: false,
        }
    }

    /// Append a drained batch to the pending list.
    pub fn receive(&mut self, batch: impl IntoIterator<Item = AchievementRecord>) {
        if self.torn_down {
            return;
        }
        self.pending.extend(batch);
    }

    /// Show the next pending record if nothing is currently showing.
    pub fn promote(&mut self, now: Instant) -> Option<Shown> {
        if self.torn_down || !self.state.is_idle() {
            return None;
        }

        // Deadline first: a record leaves the pending list only once it
        // has somewhere to go.
        let expires_at = now.checked_add(self.dwell)?;
        let record = self.pending.pop_front()?;
        self.ticket += 1;
        self.state = DisplayState::Showing {
            record: record.clone(),
            expires_at,
        };

        Some(Shown {
            record,
            expires_at,
            ticket: self.ticket,
        })
    }

    pub fn expire(&mut self, ticket: u64, now: Instant) -> Expiry {
        if ticket != self.ticket {
            return Expiry::Stale;
        }

        match &self.state {
            DisplayState::Idle => Expiry::Stale,
            DisplayState::Showing { expires_at, .. } if now < *expires_at => {
                Expiry::Early(*expires_at - now)
            }
            DisplayState::Showing { .. } => {
                match std::mem::replace(&mut self.state, DisplayState::Idle) {
                    DisplayState::Showing { record, .. } => Expiry::Expired(record),
                    DisplayState::Idle => Expiry::Stale,
                }
            }
        }
    }

    /// Discard everything and refuse further work. Returns the number of
    /// records dropped, including the one showing.
    pub fn teardown(&mut self) -> usize {
        let showing = usize::from(!self.state.is_idle());
        let discarded = showing + self.pending.len();

        self.state = DisplayState::Idle;
        self.pending.clear();
        self.ticket += 1;
        self.torn_down = true;

        discarded
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }
}
