//! In-memory event bus with channel subscribers and inline listeners.

use std::sync::{Arc, Mutex, mpsc};

use crate::bus::{EventBus, Subscription};

#[derive(Debug)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

/// Handle returned by [`InMemoryEventBus::listen`], used to unregister.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<M> = Arc<dyn Fn(&M) + Send + Sync>;

struct Listeners<M> {
    next_id: u64,
    entries: Vec<(ListenerId, Listener<M>)>,
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Channel subscribers receive clones; dropped subscriptions are pruned
/// - Listeners are called inline on the publishing thread, in registration order
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
    listeners: Mutex<Listeners<M>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked synchronously for every published message.
    pub fn listen<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        let mut listeners = match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        id
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn unlisten(&self, id: ListenerId) -> bool {
        let mut listeners = match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry_id, _)| *entry_id != id);
        listeners.entries.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.entries.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            listeners: Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }
}

impl<M> core::fmt::Debug for InMemoryEventBus<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryEventBus")
            .field(
                "subscribers",
                &self.subscribers.lock().map(|s| s.len()).unwrap_or(0),
            )
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        {
            let mut subs = self
                .subscribers
                .lock()
                .map_err(|_| InMemoryBusError::Poisoned)?;

            // Drop any dead subscribers while publishing.
            let before = subs.len();
            subs.retain(|tx| tx.send(message.clone()).is_ok());
            if subs.len() < before {
                tracing::trace!(dropped = before - subs.len(), "pruned closed subscribers");
            }
        }

        // Snapshot so a listener may (un)register without deadlocking.
        let listeners: Vec<Listener<M>> = self
            .listeners
            .lock()
            .map_err(|_| InMemoryBusError::Poisoned)?
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(&message);
        }

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}
