use parking_lot::Mutex;
use std::sync::{Arc, Weak};

pub type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Payload-less broadcast telling subscribers that the announcement queue
/// changed. Listeners run synchronously, in subscription order.
#[derive(Default)]
pub struct DeliveryChannel {
    registry: Arc<Mutex<Registry>>,
}

impl DeliveryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned
    /// [`Subscription`] is unsubscribed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, listener));
        tracing::debug!("Delivery channel subscriber {} registered", id);

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Wake every current listener once.
    pub fn notify(&self) {
        // Snapshot so listeners can (un)subscribe without deadlocking.
        let listeners: Vec<Listener> = self
            .registry
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }
}

/// Capability to deregister a listener from a [`DeliveryChannel`].
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }

    fn detach(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        // Dropped after the lock is released; a listener may own other
        // subscriptions.
        let removed: Vec<(u64, Listener)> = {
            let mut registry = registry.lock();
            let (removed, kept) = std::mem::take(&mut registry.listeners)
                .into_iter()
                .partition(|(id, _)| *id == self.id);
            registry.listeners = kept;
            removed
        };

        if !removed.is_empty() {
            tracing::debug!("Delivery channel subscriber {} removed", self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
