use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stroymarket_core::{Aggregate, AggregateRoot, DomainError};
use stroymarket_events::Event;

use crate::line_item::{LineItem, LineKey};
use crate::totals::CartTotals;

/// Cart identifier: the storage key the cart is persisted under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(String);

impl CartId {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CartId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregate root: Cart.
///
/// Invariants:
/// - at most one line per [`LineKey`]
/// - every line has `quantity >= 1`
/// - new lines are appended; merges and quantity changes keep positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: CartId,
    items: Vec<LineItem>,
    version: u64,
}

impl Cart {
    pub fn empty(id: CartId) -> Self {
        Self {
            id,
            items: Vec::new(),
            version: 0,
        }
    }

    /// Rebuild a cart from persisted lines, rejecting data that breaks the
    /// invariants (zero quantities, duplicate keys).
    pub fn restore(id: CartId, items: Vec<LineItem>) -> Result<Self, DomainError> {
        for (idx, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(DomainError::invariant(format!(
                    "line {idx} ({}) has zero quantity",
                    item.key()
                )));
            }
            let key = item.key();
            if items[..idx].iter().any(|earlier| key.matches(earlier)) {
                return Err(DomainError::invariant(format!("duplicate line {key}")));
            }
        }

        Ok(Self {
            id,
            items,
            version: 0,
        })
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn line(&self, key: &LineKey) -> Option<&LineItem> {
        self.items.iter().find(|item| key.matches(item))
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::of(&self.items)
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub item: LineItem,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub key: LineKey,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateQuantity (absolute; `<= 0` removes the line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantity {
    pub key: LineKey,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    UpdateQuantity(UpdateQuantity),
    ClearCart(ClearCart),
}

/// Event: ItemAdded (a new line was appended).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: LineItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemMerged (an add landed on an existing line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMerged {
    pub key: LineKey,
    pub added: u32,
    /// Line quantity after the merge.
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub key: LineKey,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub key: LineKey,
    pub from: u32,
    pub to: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub removed_lines: usize,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    ItemMerged(ItemMerged),
    ItemRemoved(ItemRemoved),
    QuantityChanged(QuantityChanged),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item.added",
            CartEvent::ItemMerged(_) => "cart.item.merged",
            CartEvent::ItemRemoved(_) => "cart.item.removed",
            CartEvent::QuantityChanged(_) => "cart.item.quantity_changed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::ItemMerged(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            CartEvent::ItemMerged(e) => {
                // Only the quantity moves; the stored snapshot wins.
                if let Some(line) = self.items.iter_mut().find(|i| e.key.matches(i)) {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::ItemRemoved(e) => {
                self.items.retain(|i| !e.key.matches(i));
            }
            CartEvent::QuantityChanged(e) => {
                if let Some(line) = self.items.iter_mut().find(|i| e.key.matches(i)) {
                    line.quantity = e.to;
                }
            }
            CartEvent::CartCleared(_) => {
                self.items.clear();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add(cmd),
            CartCommand::RemoveItem(cmd) => Ok(self.handle_remove(&cmd.key, cmd.occurred_at)),
            CartCommand::UpdateQuantity(cmd) => Ok(self.handle_update_quantity(cmd)),
            CartCommand::ClearCart(cmd) => Ok(self.handle_clear(cmd)),
        }
    }
}

impl Cart {
    /// An add on an existing line only bumps its quantity. Name, price and
    /// variant fields keep the first write, so a stale price survives a re-add.
    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<CartEvent>, DomainError> {
        if cmd.item.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let key = cmd.item.key();
        let event = match self.line(&key) {
            Some(existing) => CartEvent::ItemMerged(ItemMerged {
                quantity: existing.quantity.saturating_add(cmd.item.quantity),
                added: cmd.item.quantity,
                key,
                occurred_at: cmd.occurred_at,
            }),
            None => CartEvent::ItemAdded(ItemAdded {
                item: cmd.item.clone(),
                occurred_at: cmd.occurred_at,
            }),
        };

        Ok(vec![event])
    }

    fn handle_remove(&self, key: &LineKey, occurred_at: DateTime<Utc>) -> Vec<CartEvent> {
        if self.line(key).is_none() {
            return vec![];
        }

        vec![CartEvent::ItemRemoved(ItemRemoved {
            key: key.clone(),
            occurred_at,
        })]
    }

    fn handle_update_quantity(&self, cmd: &UpdateQuantity) -> Vec<CartEvent> {
        if cmd.quantity <= 0 {
            return self.handle_remove(&cmd.key, cmd.occurred_at);
        }

        let Some(line) = self.line(&cmd.key) else {
            return vec![];
        };

        let to = u32::try_from(cmd.quantity).unwrap_or(u32::MAX);
        if line.quantity == to {
            return vec![];
        }

        vec![CartEvent::QuantityChanged(QuantityChanged {
            key: cmd.key.clone(),
            from: line.quantity,
            to,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Vec<CartEvent> {
        if self.items.is_empty() {
            return vec![];
        }

        vec![CartEvent::CartCleared(CartCleared {
            removed_lines: self.items.len(),
            occurred_at: cmd.occurred_at,
        })]
    }
}
