//! `stroymarket-core`: identifiers, money, the domain error model and the
//! model traits shared by the catalog, cart and sales crates.
//!
//! No IO lives here.

pub mod error;
pub mod id;
pub mod model;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, CustomerId, OrderId, ProductId, VariantId};
pub use model::{Aggregate, AggregateRoot, Entity, ValueObject, find_by_id};
pub use money::Money;
