//! In-memory catalog repository.

use tracing::{debug, info};

use stroymarket_core::{AggregateRoot, CategoryId, DomainError, ProductId};
use stroymarket_events::{Event, execute};

use crate::product::{Category, Product, ProductCommand, ProductEvent};
use crate::query::{CatalogFilter, SortOrder};
use crate::stock::StockStatus;

/// Categories and products, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// Rejects duplicate product or category ids.
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Result<Self, DomainError> {
        for (idx, category) in categories.iter().enumerate() {
            if categories[..idx].iter().any(|c| c.id == category.id) {
                return Err(DomainError::conflict(format!("duplicate category id {}", category.id)));
            }
        }
        for (idx, product) in products.iter().enumerate() {
            if products[..idx].iter().any(|p| p.id() == product.id()) {
                return Err(DomainError::conflict(format!("duplicate product id {}", product.id())));
            }
        }
        Ok(Self { categories, products })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        stroymarket_core::find_by_id(&self.categories, id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    /// Filter, then stable-sort. `SortOrder::Default` keeps catalog order.
    pub fn query(&self, filter: &CatalogFilter, sort: SortOrder) -> Vec<&Product> {
        let mut found: Vec<&Product> = self.products.iter().filter(|p| filter.matches(p)).collect();
        found.sort_by(|a, b| sort.compare(a, b));
        found
    }

    /// Run a back-office command against one product.
    pub fn execute(&mut self, product_id: &ProductId, command: &ProductCommand) -> Result<Vec<ProductEvent>, DomainError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id() == product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;

        let events = execute(product, command)?;
        if events.is_empty() {
            debug!(product_id = %product_id, "product command was a no-op");
        }
        for event in &events {
            info!(
                product_id = %product_id,
                event_type = event.event_type(),
                version = product.version(),
                "product updated"
            );
        }
        Ok(events)
    }

    /// `0 < stock <= threshold`, on product-level stock.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.stock_status(None) == StockStatus::Low)
            .collect()
    }

    pub fn out_of_stock(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.stock_status(None) == StockStatus::Out)
            .collect()
    }

    pub fn on_sale(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_on_sale()).collect()
    }

    pub fn new_arrivals(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_new()).collect()
    }

    /// First `n` products in catalog order.
    pub fn featured(&self, n: usize) -> &[Product] {
        &self.products[..n.min(self.products.len())]
    }
}
