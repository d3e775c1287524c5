//! Derived cart totals.

use serde::Serialize;

use stroymarket_core::Money;

use crate::line_item::LineItem;

/// Aggregates derived from the line items; never stored.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Σ `price * quantity`.
    pub total: Money,
    /// Σ `quantity`.
    pub count: u64,
}

impl CartTotals {
    pub fn of(items: &[LineItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            total: acc.total + item.subtotal(),
            count: acc.count + u64::from(item.quantity),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroymarket_core::ProductId;

    #[test]
    fn empty_cart_is_zero() {
        assert_eq!(CartTotals::of(&[]), CartTotals { total: Money::ZERO, count: 0 });
    }

    #[test]
    fn sums_price_times_quantity_and_quantities() {
        let items = [
            LineItem::new(ProductId::new("p001"), "Цемент", Money::new(480), "мешок", 2),
            LineItem::new(ProductId::new("p004"), "Арматура", Money::new(85), "пог.м", 10),
        ];
        let totals = CartTotals::of(&items);
        assert_eq!(totals.total, Money::new(1810));
        assert_eq!(totals.count, 12);
    }
}
