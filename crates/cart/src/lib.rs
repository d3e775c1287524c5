//! Shopping cart: line-item identity, the cart aggregate, derived totals and
//! the persisted `CartStore` the storefront pages share.
//!
//! Mutations are decided and applied by the `Cart` aggregate, then the store
//! writes the full item list to a key-value store and publishes the events.

pub mod cart;
pub mod line_item;
pub mod storage;
pub mod store;
pub mod totals;

pub use cart::{
    AddItem, Cart, CartCleared, CartCommand, CartEvent, CartId, ClearCart, ItemAdded, ItemMerged,
    ItemRemoved, QuantityChanged, RemoveItem, UpdateQuantity,
};
pub use line_item::{LineItem, LineKey};
pub use storage::{FileStore, KeyValueStore, MemoryStore, default_data_dir};
pub use store::{CART_STORAGE_KEY, CartStore};
pub use totals::CartTotals;
