//! The session's cart: aggregate + persistence + change notification.

use chrono::Utc;

use stroymarket_core::{AggregateRoot, DomainResult, Money, ProductId, VariantId};
use stroymarket_events::{EventBus, InMemoryEventBus, ListenerId, Subscription, execute};

use crate::cart::{AddItem, Cart, CartCommand, CartEvent, CartId, ClearCart, RemoveItem, UpdateQuantity};
use crate::line_item::{LineItem, LineKey};
use crate::storage::KeyValueStore;
use crate::totals::CartTotals;

/// Storage key the cart lives under unless the caller picks another.
pub const CART_STORAGE_KEY: &str = "stroymarket_cart";

/// Persisted shopping cart.
///
/// Construct one per session and hand it (by reference) to whatever needs
/// the cart; there is no global instance. Lifecycle: `open` (rehydrate) →
/// mutate* → optionally `clear_cart`.
///
/// After every mutation that changed something, the full line list is
/// written to storage as a JSON array, then the events are published to
/// subscribers and listeners. A write failure is logged and the in-memory
/// state stays authoritative.
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    bus: InMemoryEventBus<CartEvent>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart stored under [`CART_STORAGE_KEY`].
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, CART_STORAGE_KEY)
    }

    /// Open the cart stored under `key`.
    ///
    /// A missing, unreadable or corrupt entry yields an empty cart; the
    /// failure is logged, never returned.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let id = CartId::new(key);
        let cart = load(&storage, &id);

        tracing::debug!(
            cart = %id,
            lines = cart.items().len(),
            "cart opened"
        );

        Self {
            cart,
            storage,
            bus: InMemoryEventBus::new(),
        }
    }

    /// Add a line, or merge its quantity into the existing line with the
    /// same product/variant.
    ///
    /// On merge only the quantity changes: the name, price, unit and variant
    /// labels recorded by the first add are kept.
    pub fn add_item(&mut self, item: LineItem) -> DomainResult<()> {
        self.dispatch(CartCommand::AddItem(AddItem {
            item,
            occurred_at: Utc::now(),
        }))
    }

    /// Remove the line for `product_id`/`variant_id`. No-op if absent.
    pub fn remove_item(&mut self, product_id: &ProductId, variant_id: Option<&VariantId>) {
        let key = LineKey::new(product_id.clone(), variant_id.cloned());
        self.dispatch_infallible(CartCommand::RemoveItem(RemoveItem {
            key,
            occurred_at: Utc::now(),
        }));
    }

    /// Set a line's quantity. `quantity <= 0` removes the line; a missing
    /// line is left alone.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
        quantity: i64,
    ) {
        let key = LineKey::new(product_id.clone(), variant_id.cloned());
        self.dispatch_infallible(CartCommand::UpdateQuantity(UpdateQuantity {
            key,
            quantity,
            occurred_at: Utc::now(),
        }));
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.dispatch_infallible(CartCommand::ClearCart(ClearCart {
            occurred_at: Utc::now(),
        }));
    }

    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    pub fn line(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> Option<&LineItem> {
        self.cart
            .line(&LineKey::new(product_id.clone(), variant_id.cloned()))
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Σ `price * quantity` over the current lines.
    pub fn total(&self) -> Money {
        self.totals().total
    }

    /// Σ `quantity` over the current lines.
    pub fn count(&self) -> u64 {
        self.totals().count
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// Number of events applied since the cart was opened.
    pub fn version(&self) -> u64 {
        self.cart.version()
    }

    pub fn key(&self) -> &str {
        self.cart.id().as_str()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> Subscription<CartEvent> {
        self.bus.subscribe()
    }

    /// Call `listener` after each applied change, inline.
    pub fn listen<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        self.bus.listen(listener)
    }

    pub fn unlisten(&self, id: ListenerId) -> bool {
        self.bus.unlisten(id)
    }

    fn dispatch(&mut self, command: CartCommand) -> DomainResult<()> {
        let events = execute(&mut self.cart, &command)?;
        if events.is_empty() {
            tracing::trace!(cart = %self.cart.id(), ?command, "cart command changed nothing");
            return Ok(());
        }

        for event in &events {
            log_event(event);
        }

        self.persist();

        for event in events {
            if let Err(err) = self.bus.publish(event) {
                tracing::warn!(cart = %self.cart.id(), "failed to publish cart event: {err:?}");
            }
        }

        Ok(())
    }

    /// For commands whose handlers only ever return `Ok`.
    fn dispatch_infallible(&mut self, command: CartCommand) {
        if let Err(err) = self.dispatch(command) {
            tracing::error!(cart = %self.cart.id(), kind = err.kind(), "cart command rejected: {err}");
        }
    }

    fn persist(&self) {
        let id = self.cart.id();
        let payload = match serde_json::to_string(self.cart.items()) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(cart = %id, "failed to serialize cart: {err:?}");
                return;
            }
        };

        if let Err(err) = self.storage.set(id.as_str(), &payload) {
            tracing::error!(cart = %id, "failed to persist cart: {err:?}");
        }
    }
}

impl<S> core::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

fn load<S: KeyValueStore>(storage: &S, id: &CartId) -> Cart {
    let raw = match storage.get(id.as_str()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::empty(id.clone()),
        Err(err) => {
            tracing::warn!(cart = %id, "failed to read stored cart, starting empty: {err:?}");
            return Cart::empty(id.clone());
        }
    };

    let items: Vec<LineItem> = match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(cart = %id, "stored cart is not valid JSON, starting empty: {err}");
            return Cart::empty(id.clone());
        }
    };

    match Cart::restore(id.clone(), items) {
        Ok(cart) => cart,
        Err(err) => {
            tracing::warn!(cart = %id, "stored cart is inconsistent, starting empty: {err}");
            Cart::empty(id.clone())
        }
    }
}

fn log_event(event: &CartEvent) {
    match event {
        CartEvent::ItemAdded(e) => tracing::debug!(
            key = %e.item.key(),
            quantity = e.item.quantity,
            price = e.item.price.amount(),
            "cart line added"
        ),
        CartEvent::ItemMerged(e) => tracing::debug!(
            key = %e.key,
            added = e.added,
            quantity = e.quantity,
            "cart line merged"
        ),
        CartEvent::ItemRemoved(e) => tracing::debug!(key = %e.key, "cart line removed"),
        CartEvent::QuantityChanged(e) => tracing::debug!(
            key = %e.key,
            from = e.from,
            to = e.to,
            "cart line quantity changed"
        ),
        CartEvent::CartCleared(e) => {
            tracing::debug!(removed_lines = e.removed_lines, "cart cleared")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::{Arc, Mutex};
    use stroymarket_events::Event;

    fn line(product: &str, variant: Option<&str>, price: i64, qty: u32) -> LineItem {
        let mut item = LineItem::new(ProductId::new(product), "Товар", Money::new(price), "шт", qty);
        item.variant_id = variant.map(VariantId::new);
        item
    }

    #[test]
    fn opens_empty_when_nothing_stored() {
        let store = CartStore::open(MemoryStore::new());
        assert!(store.is_empty());
        assert_eq!(store.total(), Money::ZERO);
        assert_eq!(store.count(), 0);
        assert_eq!(store.key(), CART_STORAGE_KEY);
    }

    #[test]
    fn every_change_is_written_under_the_key() {
        let storage = MemoryStore::new();
        let mut store = CartStore::open(storage.clone());

        store.add_item(line("p1", None, 100, 2)).unwrap();
        let raw = storage.get(CART_STORAGE_KEY).unwrap().unwrap();
        let stored: Vec<LineItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, store.items());

        store.clear_cart();
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn noop_commands_do_not_write() {
        let storage = MemoryStore::new();
        let mut store = CartStore::open(storage.clone());

        store.remove_item(&ProductId::new("p1"), None);
        store.update_quantity(&ProductId::new("p1"), None, 3);
        store.clear_cart();

        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), None);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn corrupt_or_inconsistent_data_opens_empty() {
        let storage = MemoryStore::new();
        storage.set(CART_STORAGE_KEY, "{not json").unwrap();
        assert!(CartStore::open(storage.clone()).is_empty());

        storage
            .set(CART_STORAGE_KEY, r#"[{"productId":"p1","productName":"A","price":1,"unit":"шт","quantity":-2}]"#)
            .unwrap();
        assert!(CartStore::open(storage.clone()).is_empty());

        storage
            .set(CART_STORAGE_KEY, r#"[{"productId":"p1","productName":"A","price":1,"unit":"шт","quantity":0}]"#)
            .unwrap();
        assert!(CartStore::open(storage).is_empty());
    }

    #[test]
    fn reads_camel_case_storefront_layout() {
        let storage = MemoryStore::new();
        storage
            .set(
                CART_STORAGE_KEY,
                r#"[{"productId":"p003","productName":"Доска обрезная 50×150×6000","price":352,"unit":"пог.м","quantity":4,"variantId":"v1","variantName":"Сорт","variantValue":"1-й сорт"}]"#,
            )
            .unwrap();

        let store = CartStore::open(storage);
        assert_eq!(store.count(), 4);
        assert_eq!(store.total(), Money::new(1408));
        let line = store
            .line(&ProductId::new("p003"), Some(&VariantId::new("v1")))
            .unwrap();
        assert_eq!(line.variant_value.as_deref(), Some("1-й сорт"));
    }

    #[test]
    fn listeners_see_events_after_state_is_applied() {
        let mut store = CartStore::open(MemoryStore::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let id = store.listen(move |event: &CartEvent| {
            seen_clone.lock().unwrap().push(event.clone());
        });
        let sub = store.subscribe();

        store.add_item(line("p1", None, 10, 1)).unwrap();
        store.add_item(line("p1", None, 10, 1)).unwrap();
        store.update_quantity(&ProductId::new("p1"), None, 0);

        let via_listener = seen.lock().unwrap().clone();
        let via_channel = sub.drain();
        assert_eq!(via_listener, via_channel);
        let kinds: Vec<&str> = via_channel.iter().map(|e| e.event_type()).collect();
        assert_eq!(kinds, vec!["cart.item.added", "cart.item.merged", "cart.item.removed"]);

        assert!(store.unlisten(id));
    }

    #[test]
    fn add_item_rejects_zero_quantity_without_writing() {
        let storage = MemoryStore::new();
        let mut store = CartStore::open(storage.clone());
        assert!(store.add_item(line("p1", None, 10, 0)).is_err());
        assert!(store.is_empty());
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), None);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("storage unavailable")
        }

        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("quota exceeded")
        }

        fn remove(&self, _key: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn storage_failures_are_not_surfaced() {
        let mut store = CartStore::open(FailingStore);
        assert!(store.is_empty());

        store.add_item(line("p1", None, 10, 2)).unwrap();
        assert_eq!(store.count(), 2);
    }
}
