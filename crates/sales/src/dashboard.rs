//! Back-office overview numbers.

use serde::Serialize;

use stroymarket_catalog::Catalog;
use stroymarket_core::{AggregateRoot, Money, OrderId, ProductId};

use crate::order::OrderStatus;
use crate::order_book::OrderBook;

/// Orders shown in the "recent orders" panel.
pub const RECENT_ORDERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub revenue: Money,
    pub product_count: usize,
    /// `0 < stock <= threshold`.
    pub low_stock: Vec<ProductId>,
    pub out_of_stock: Vec<ProductId>,
    pub recent_orders: Vec<OrderId>,
    /// Order count per status, in lifecycle order.
    pub by_status: Vec<(OrderStatus, usize)>,
}

impl DashboardStats {
    pub fn collect(orders: &OrderBook, catalog: &Catalog) -> Self {
        Self {
            total_orders: orders.len(),
            pending_orders: orders.pending_count(),
            revenue: orders.revenue(),
            product_count: catalog.products().len(),
            low_stock: catalog.low_stock().into_iter().map(|p| p.id().clone()).collect(),
            out_of_stock: catalog.out_of_stock().into_iter().map(|p| p.id().clone()).collect(),
            recent_orders: orders
                .recent(RECENT_ORDERS)
                .into_iter()
                .map(|o| o.id().clone())
                .collect(),
            by_status: OrderStatus::ALL
                .into_iter()
                .map(|s| (s, orders.by_status(Some(s)).len()))
                .collect(),
        }
    }

    /// `true` when something in the catalog needs restocking.
    pub fn needs_attention(&self) -> bool {
        !self.low_stock.is_empty() || !self.out_of_stock.is_empty()
    }
}
