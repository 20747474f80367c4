//! Achievement notification delivery.
//!
//! Producers push [`AchievementRecord`](crate::domain::AchievementRecord)s
//! onto the [`AnnouncementQueue`], which pokes the [`DeliveryChannel`].
//! A single mounted [`AchievementDisplay`] drains the queue into its own
//! pending list and shows one card at a time for a fixed dwell.

pub mod channel;
pub mod display;
pub mod machine;
pub mod queue;
pub mod surface;
pub mod timer;

pub use channel::{DeliveryChannel, Subscription};
pub use display::{AchievementDisplay, MountedDisplay};
pub use machine::{DisplayMachine, Expiry, Shown, MAX_DWELL};
pub use queue::AnnouncementQueue;
pub use surface::{DisplayedCard, FeedRenderer, Renderer, TracingRenderer};
pub use timer::{Timer, TimerCallback, TimerHandle, TokioTimer};

#[cfg(any(test, feature = "test-utils"))]
pub use surface::{RecordingRenderer, RenderEvent};
#[cfg(any(test, feature = "test-utils"))]
pub use timer::ManualTimer;

use std::time::Duration;

/// How long a notification stays on screen unless configured otherwise.
pub const DEFAULT_DWELL: Duration = Duration::from_secs(5);
