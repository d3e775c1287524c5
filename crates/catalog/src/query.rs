//! Catalog listing filters and sort orders.

use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stroymarket_core::{CategoryId, DomainError, Money};

use crate::product::Product;

/// Listing filter. Every unset field matches everything; price bounds are
/// inclusive and apply to the undiscounted base price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub category: Option<CategoryId>,
    pub price_min: Option<Money>,
    pub price_max: Option<Money>,
    /// Hide products whose product-level stock is zero.
    pub in_stock_only: bool,
    pub sale_only: bool,
}

impl CatalogFilter {
    pub fn category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn price_between(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    pub fn sale_only(mut self) -> Self {
        self.sale_only = true;
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if self.category.as_ref().is_some_and(|c| c != product.category()) {
            return false;
        }
        if self.price_min.is_some_and(|min| product.price() < min) {
            return false;
        }
        if self.price_max.is_some_and(|max| product.price() > max) {
            return false;
        }
        if self.in_stock_only && product.stock() == 0 {
            return false;
        }
        if self.sale_only && !product.is_on_sale() {
            return false;
        }
        true
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    /// Highest rated first.
    Rating,
    Name,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Default => "default",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::Rating => "rating",
            SortOrder::Name => "name",
        }
    }

    /// Comparator for a stable sort; `Default` compares everything equal.
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::Default => Ordering::Equal,
            SortOrder::PriceAsc => a.price().cmp(&b.price()),
            SortOrder::PriceDesc => b.price().cmp(&a.price()),
            SortOrder::Rating => b.rating().total_cmp(&a.rating()),
            SortOrder::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        }
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "default" => Ok(SortOrder::Default),
            "price_asc" => Ok(SortOrder::PriceAsc),
            "price_desc" => Ok(SortOrder::PriceDesc),
            "rating" => Ok(SortOrder::Rating),
            "name" => Ok(SortOrder::Name),
            other => Err(DomainError::validation(format!("unknown sort order: {other}"))),
        }
    }
}

impl core::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
