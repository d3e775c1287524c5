//! Catalog domain module.
//!
//! Products, variants and categories, the price resolution policy used when a
//! product is put into the cart, stock status, catalog filtering/sorting and
//! the back-office product commands. Pure domain logic over in-memory data.

pub mod catalog;
pub mod pricing;
pub mod product;
pub mod query;
pub mod seed;
pub mod stock;

pub use catalog::Catalog;
pub use pricing::{PriceQuote, sale_price};
pub use product::{
    Category, DetailsUpdated, NewProduct, PricingUpdated, Product, ProductCommand, ProductEvent,
    ProductVariant, Sale, StockUpdated, UpdateDetails, UpdatePricing, UpdateStock,
};
pub use query::{CatalogFilter, SortOrder};
pub use stock::StockStatus;
