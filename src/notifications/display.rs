use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::channel::Subscription;
use super::machine::{DisplayMachine, Expiry};
use super::queue::AnnouncementQueue;
use super::surface::Renderer;
use super::timer::{Timer, TimerHandle};
use crate::domain::{DisplayState, NotificationCard};

/// The single consumer of the announcement queue. Build one, then
/// [`mount`](AchievementDisplay::mount) it near the root of the app.
pub struct AchievementDisplay {
    queue: Arc<AnnouncementQueue>,
    timer: Arc<dyn Timer>,
    renderer: Arc<dyn Renderer>,
    dwell: Duration,
}

impl AchievementDisplay {
    pub fn new(
        queue: Arc<AnnouncementQueue>,
        timer: Arc<dyn Timer>,
        renderer: Arc<dyn Renderer>,
        dwell: Duration,
    ) -> Self {
        Self {
            queue,
            timer,
            renderer,
            dwell,
        }
    }

    /// Subscribe to the delivery channel and pick up anything already
    /// waiting in the queue.
    pub fn mount(self) -> MountedDisplay {
        let machine = DisplayMachine::new(self.dwell);
        tracing::info!(
            "Achievement display mounted (dwell {}ms)",
            machine.dwell().as_millis()
        );

        let inner = Arc::new(DisplayInner {
            machine: Mutex::new(machine),
            queue: self.queue,
            timer: self.timer,
            renderer: self.renderer,
            outstanding: Mutex::new(None),
            outbox: Mutex::new(Outbox::default()),
        });

        let listener = Arc::downgrade(&inner);
        let subscription = inner.queue.channel().subscribe(move || {
            if let Some(inner) = listener.upgrade() {
                inner.on_notified();
            }
        });

        inner.on_notified();

        MountedDisplay {
            inner,
            subscription: Some(subscription),
        }
    }
}

enum RenderAction {
    Show(NotificationCard, Instant),
    Clear,
}

/// Render calls queued in state order. Whoever finds it idle drains it,
/// outside the machine lock, so a renderer may trigger achievements.
#[derive(Default)]
struct Outbox {
    actions: VecDeque<RenderAction>,
    draining: bool,
}

struct DisplayInner {
    machine: Mutex<DisplayMachine>,
    queue: Arc<AnnouncementQueue>,
    timer: Arc<dyn Timer>,
    renderer: Arc<dyn Renderer>,
    outstanding: Mutex<Option<TimerHandle>>,
    outbox: Mutex<Outbox>,
}

impl DisplayInner {
    fn on_notified(self: &Arc<Self>) {
        {
            let mut machine = self.machine.lock();
            if machine.is_torn_down() {
                return;
            }

            let batch = self.queue.drain_all();
            if !batch.is_empty() {
                tracing::debug!(
                    "Display drained {} achievement(s), {} already pending",
                    batch.len(),
                    machine.pending_len()
                );
            }
            machine.receive(batch);
            self.advance(&mut machine);
        }
        self.flush();
    }

    fn on_expired(self: &Arc<Self>, ticket: u64) {
        {
            let mut machine = self.machine.lock();

            match machine.expire(ticket, self.timer.now()) {
                Expiry::Expired(record) => {
                    tracing::debug!("Achievement '{}' expired", record.title);
                    self.outstanding.lock().take();
                    self.push(RenderAction::Clear);
                    self.advance(&mut machine);
                }
                Expiry::Early(remaining) => {
                    tracing::debug!(
                        "Dwell timer {} fired {}ms early, re-arming",
                        ticket,
                        remaining.as_millis()
                    );
                    self.arm(ticket, remaining);
                }
                Expiry::Stale => {
                    tracing::debug!("Ignoring stale dwell timer {}", ticket);
                }
            }
        }
        self.flush();
    }

    fn advance(self: &Arc<Self>, machine: &mut DisplayMachine) {
        if let Some(shown) = machine.promote(self.timer.now()) {
            tracing::info!(
                "Displaying achievement '{}' ({} pts), {} pending",
                shown.record.title,
                shown.record.points,
                machine.pending_len()
            );
            self.push(RenderAction::Show(
                NotificationCard::from(&shown.record),
                shown.expires_at,
            ));
            self.arm(shown.ticket, machine.dwell());
        }
    }

    fn arm(self: &Arc<Self>, ticket: u64, delay: Duration) {
        let inner = Arc::downgrade(self);
        let handle = self.timer.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.on_expired(ticket);
                }
            }),
        );

        if let Some(previous) = self.outstanding.lock().replace(handle) {
            previous.cancel();
        }
    }

    /// Called with the machine lock held so actions keep state order.
    fn push(&self, action: RenderAction) {
        self.outbox.lock().actions.push_back(action);
    }

    /// Apply queued render actions. Must be called without the machine
    /// lock. A nested or concurrent call leaves the work to the caller
    /// already draining.
    fn flush(&self) {
        {
            let mut outbox = self.outbox.lock();
            if outbox.draining {
                return;
            }
            outbox.draining = true;
        }
        let guard = DrainGuard(&self.outbox);

        loop {
            let action = {
                let mut outbox = self.outbox.lock();
                match outbox.actions.pop_front() {
                    Some(action) => action,
                    None => {
                        // Released under the same lock that saw it empty,
                        // so a concurrent push is never stranded.
                        outbox.draining = false;
                        break;
                    }
                }
            };
            match action {
                RenderAction::Show(card, expires_at) => self.renderer.show(&card, expires_at),
                RenderAction::Clear => self.renderer.clear(),
            }
        }
        std::mem::forget(guard);
    }
}

/// Releases the drain claim if a renderer panics mid-flush.
struct DrainGuard<'a>(&'a Mutex<Outbox>);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().draining = false;
    }
}

/// A display attached to the delivery channel. Unmounting (or dropping)
/// cancels the dwell timer and discards undelivered pending records;
/// records still in the shared queue stay there.
pub struct MountedDisplay {
    inner: Arc<DisplayInner>,
    subscription: Option<Subscription>,
}

impl MountedDisplay {
    pub fn unmount(mut self) {
        self.teardown();
    }

    pub fn state(&self) -> DisplayState {
        self.inner.machine.lock().state().clone()
    }

    pub fn pending_len(&self) -> usize {
        self.inner.machine.lock().pending_len()
    }

    pub fn is_idle(&self) -> bool {
        self.inner.machine.lock().is_idle()
    }

    fn teardown(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };
        subscription.unsubscribe();

        let discarded = {
            let mut machine = self.inner.machine.lock();
            let was_showing = !machine.is_idle();
            let discarded = machine.teardown();
            if let Some(handle) = self.inner.outstanding.lock().take() {
                handle.cancel();
            }
            if was_showing {
                self.inner.push(RenderAction::Clear);
            }
            discarded
        };
        self.inner.flush();

        tracing::info!(
            "Achievement display unmounted, {} undelivered record(s) discarded",
            discarded
        );
    }
}

impl Drop for MountedDisplay {
    fn drop(&mut self) {
        self.teardown();
    }
}
