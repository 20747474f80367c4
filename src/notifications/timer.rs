use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Host capability to run a callback after a delay. Also the display's
/// clock, so a virtual timer can drive time in tests.
pub trait Timer: Send + Sync {
    fn now(&self) -> Instant;
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;
}

/// Cancels a scheduled callback. Cancelling after it already ran is a no-op.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Spawns one tokio task per scheduled callback.
#[derive(Clone)]
pub struct TokioTimer {
    handle: Handle,
}

impl TokioTimer {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Timer for TokioTimer {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        self.handle.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if !cancelled.is_cancelled() {
                        callback();
                    }
                }
            }
        });

        TimerHandle::new(token)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use manual::ManualTimer;

#[cfg(any(test, feature = "test-utils"))]
mod manual {
    use super::*;
    use parking_lot::Mutex;

    struct Entry {
        seq: u64,
        deadline: Instant,
        token: CancellationToken,
        callback: TimerCallback,
    }

    struct State {
        now: Instant,
        seq: u64,
        entries: Vec<Entry>,
    }

    /// Virtual clock. Callbacks only run from [`ManualTimer::advance`].
    pub struct ManualTimer {
        state: Mutex<State>,
    }

    impl ManualTimer {
        pub fn new() -> Self {
            Self {
                state: Mutex::new(State {
                    now: Instant::now(),
                    seq: 0,
                    entries: Vec::new(),
                }),
            }
        }

        /// Move the clock forward, running due callbacks in deadline order.
        /// Callbacks scheduled while advancing run too if they fall due.
        pub fn advance(&self, by: Duration) {
            let target = self.state.lock().now + by;

            loop {
                let next = {
                    let mut state = self.state.lock();
                    state.entries.retain(|e| !e.token.is_cancelled());
                    let due = state
                        .entries
                        .iter()
                        .enumerate()
                        .filter(|(_, e)| e.deadline <= target)
                        .min_by_key(|(_, e)| (e.deadline, e.seq))
                        .map(|(i, _)| i);

                    match due {
                        Some(index) => {
                            let entry = state.entries.remove(index);
                            state.now = state.now.max(entry.deadline);
                            Some(entry)
                        }
                        None => {
                            state.now = target;
                            None
                        }
                    }
                };

                match next {
                    Some(entry) => (entry.callback)(),
                    None => break,
                }
            }
        }

        pub fn scheduled(&self) -> usize {
            self.state
                .lock()
                .entries
                .iter()
                .filter(|e| !e.token.is_cancelled())
                .count()
        }
    }

    impl Default for ManualTimer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Timer for ManualTimer {
        fn now(&self) -> Instant {
            self.state.lock().now
        }

        fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
            let token = CancellationToken::new();
            let mut state = self.state.lock();
            state.seq += 1;
            let entry = Entry {
                seq: state.seq,
                deadline: state.now + delay,
                token: token.clone(),
                callback,
            };
            state.entries.push(entry);
            TimerHandle::new(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_manual_timer_runs_in_deadline_order() {
        let timer = ManualTimer::new();
        let fired = Arc::new(Mutex::new(Vec::new()));

        for (name, secs) in [("late", 3), ("early", 1), ("middle", 2)] {
            let fired = fired.clone();
            let _ = timer.schedule(
                Duration::from_secs(secs),
                Box::new(move || fired.lock().push(name)),
            );
        }

        timer.advance(Duration::from_millis(1500));
        assert_eq!(*fired.lock(), vec!["early"]);
        timer.advance(Duration::from_secs(5));
        assert_eq!(*fired.lock(), vec!["early", "middle", "late"]);
        assert_eq!(timer.scheduled(), 0);
    }

    #[test]
    fn test_manual_timer_cancel() {
        let timer = ManualTimer::new();
        let fired = Arc::new(Mutex::new(false));

        let handle = {
            let fired = fired.clone();
            timer.schedule(Duration::from_secs(1), Box::new(move || *fired.lock() = true))
        };
        handle.cancel();
        assert!(handle.is_cancelled());

        timer.advance(Duration::from_secs(2));
        assert!(!*fired.lock());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_fires_after_delay() {
        let timer = TokioTimer::current();
        let fired = Arc::new(Mutex::new(None));
        let start = timer.now();

        let _handle = {
            let fired = fired.clone();
            timer.schedule(
                Duration::from_secs(5),
                Box::new(move || *fired.lock() = Some(Instant::now())),
            )
        };

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(fired.lock().is_none());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let at = (*fired.lock()).expect("timer should have fired");
        assert_eq!(at - start, Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_cancel() {
        let timer = TokioTimer::current();
        let fired = Arc::new(Mutex::new(false));

        let handle = {
            let fired = fired.clone();
            timer.schedule(Duration::from_secs(1), Box::new(move || *fired.lock() = true))
        };
        handle.cancel();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!*fired.lock());
    }
}
