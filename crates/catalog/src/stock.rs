//! Stock availability labels.

use serde::{Deserialize, Serialize};

use stroymarket_core::VariantId;

use crate::product::Product;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    Low,
    Out,
}

impl StockStatus {
    /// `Out` at zero, `Low` at or below the threshold, otherwise `InStock`.
    pub fn classify(stock: u32, low_stock_threshold: u32) -> Self {
        if stock == 0 {
            StockStatus::Out
        } else if stock <= low_stock_threshold {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }

    pub fn is_available(self) -> bool {
        self != StockStatus::Out
    }
}

impl Product {
    /// Units on hand for the selection: the variant's stock when one is
    /// selected and known, otherwise the product-level stock.
    pub fn available_stock(&self, variant_id: Option<&VariantId>) -> u32 {
        variant_id
            .and_then(|id| self.variant(id))
            .map_or(self.stock(), |v| v.stock)
    }

    /// Availability for the selection, judged against the product's threshold.
    pub fn stock_status(&self, variant_id: Option<&VariantId>) -> StockStatus {
        StockStatus::classify(self.available_stock(variant_id), self.low_stock_threshold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroymarket_core::{Money, ProductId};

    use crate::product::{NewProduct, ProductVariant};

    #[test]
    fn classify_boundaries() {
        assert_eq!(StockStatus::classify(0, 5), StockStatus::Out);
        assert_eq!(StockStatus::classify(1, 5), StockStatus::Low);
        assert_eq!(StockStatus::classify(5, 5), StockStatus::Low);
        assert_eq!(StockStatus::classify(6, 5), StockStatus::InStock);
        assert_eq!(StockStatus::classify(0, 0), StockStatus::Out);
        assert_eq!(StockStatus::classify(1, 0), StockStatus::InStock);
    }

    #[test]
    fn selected_variant_stock_drives_status() {
        let drill = Product::new(NewProduct {
            id: ProductId::new("p007"),
            name: "Перфоратор".to_string(),
            price: Money::new(14990),
            stock: 25,
            low_stock_threshold: 5,
            variants: vec![ProductVariant {
                id: VariantId::new("v2"),
                name: "Комплектация".to_string(),
                value: "С кейсом".to_string(),
                price_modifier: Money::new(1500),
                stock: 4,
            }],
            ..NewProduct::default()
        })
        .unwrap();

        assert_eq!(drill.stock_status(None), StockStatus::InStock);
        assert_eq!(drill.stock_status(Some(&VariantId::new("v2"))), StockStatus::Low);
        assert_eq!(drill.available_stock(Some(&VariantId::new("v9"))), 25);
    }
}
