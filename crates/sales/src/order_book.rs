//! In-memory order repository for the back office.

use chrono::{DateTime, Datelike, Utc};
use tracing::{info, warn};

use stroymarket_cart::{CartStore, KeyValueStore};
use stroymarket_core::{AggregateRoot, DomainError, Money, OrderId};
use stroymarket_events::{Event, EventBus, InMemoryEventBus, Subscription, execute};

use crate::checkout::{CheckoutForm, checkout};
use crate::order::{Order, OrderCommand, OrderEvent, OrderStatus};

/// Placed orders in placement order, plus a feed of their events.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
    bus: InMemoryEventBus<OrderEvent>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placed order. Ids and numbers must be unique.
    pub fn place(&mut self, order: Order) -> Result<(), DomainError> {
        if !order.is_placed() {
            return Err(DomainError::invariant(format!("order {} has not been placed", order.id())));
        }
        if self.get(order.id()).is_some() {
            return Err(DomainError::conflict(format!("order {} already exists", order.id())));
        }
        if self.get_by_number(order.number()).is_some() {
            return Err(DomainError::conflict(format!("order number {} is taken", order.number())));
        }

        info!(
            order = order.number(),
            status = %order.status(),
            total = order.total_amount().amount(),
            "order recorded"
        );
        self.orders.push(order);
        Ok(())
    }

    /// Check out `cart` under the next free number and record the order.
    pub fn checkout<S: KeyValueStore>(
        &mut self,
        cart: &mut CartStore<S>,
        form: &CheckoutForm,
        now: DateTime<Utc>,
    ) -> Result<&Order, DomainError> {
        let number = self.next_number(now.year());
        let order = checkout(cart, form, number, now)?;
        let id = order.id().clone();
        self.place(order)?;
        self.get(&id)
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id() == id)
    }

    pub fn get_by_number(&self, number: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.number() == number)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Run a back-office command against one order and publish its events.
    pub fn execute(&mut self, id: &OrderId, command: &OrderCommand) -> Result<Vec<OrderEvent>, DomainError> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))?;

        let events = execute(order, command)?;
        for event in &events {
            info!(
                order = order.number(),
                event_type = event.event_type(),
                version = order.version(),
                "order updated"
            );
        }

        for event in &events {
            if let Err(err) = self.bus.publish(event.clone()) {
                warn!(order = %id, "failed to publish order event: {err:?}");
            }
        }
        Ok(events)
    }

    /// Orders with the given status, or all of them for `None`.
    pub fn by_status(&self, status: Option<OrderStatus>) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| status.is_none_or(|s| o.status() == s))
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.by_status(Some(OrderStatus::Pending)).len()
    }

    /// Σ `total_amount` over paid orders.
    pub fn revenue(&self) -> Money {
        self.orders
            .iter()
            .filter(|o| o.is_paid())
            .map(Order::total_amount)
            .sum()
    }

    /// The `n` most recently created orders, newest first.
    pub fn recent(&self, n: usize) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.iter().collect();
        orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        orders.truncate(n);
        orders
    }

    /// Next `"{year}-{seq:03}"` number: one past the highest sequence
    /// already used in `year`.
    pub fn next_number(&self, year: i32) -> String {
        let prefix = format!("{year}-");
        let last = self
            .orders
            .iter()
            .filter_map(|o| o.number().strip_prefix(&prefix))
            .filter_map(|seq| seq.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{year}-{:03}", last + 1)
    }

    pub fn subscribe(&self) -> Subscription<OrderEvent> {
        self.bus.subscribe()
    }
}
