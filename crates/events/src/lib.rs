//! Domain events and their in-process distribution.
//!
//! Stores publish the events their aggregates emit after every mutation, so
//! views (a cart badge, a checkout summary) can react without polling.

pub mod bus;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus, ListenerId};
