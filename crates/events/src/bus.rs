//! Publish/subscribe seam between stores and whatever renders their state.
//!
//! Stores publish only after an event has been applied and persisted, so a
//! subscriber reading the store back sees the state the event describes.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// Queue of events published after the subscription was taken.
///
/// `None` from the receive methods means nothing arrived (or the bus is
/// gone); subscribers of a single-threaded store normally just `drain`.
#[derive(Debug)]
pub struct Subscription<M> {
    inbox: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(inbox: Receiver<M>) -> Self {
        Self { inbox }
    }

    /// Wait for the next event; `None` once the bus has been dropped.
    pub fn recv(&self) -> Option<M> {
        self.inbox.recv().ok()
    }

    pub fn try_recv(&self) -> Option<M> {
        self.inbox.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<M> {
        self.inbox.recv_timeout(timeout).ok()
    }

    /// Every queued event, oldest first.
    pub fn drain(&self) -> Vec<M> {
        self.inbox.try_iter().collect()
    }
}

/// Broadcast bus: each subscription receives every published message, in
/// publication order, before `publish` returns.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        B::publish(self, message)
    }

    fn subscribe(&self) -> Subscription<M> {
        B::subscribe(self)
    }
}
