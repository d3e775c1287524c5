//! Price resolution: what a unit of a product (and variant) costs when it is
//! put into the cart.
//!
//! The effective base is the catalog price with the sale discount applied
//! (rounded half up to a whole rouble); the variant's modifier is added on
//! top of that. The modifier itself is never discounted.

use serde::Serialize;

use stroymarket_cart::LineItem;
use stroymarket_core::{AggregateRoot, DomainError, Money, VariantId};

use crate::product::{Product, ProductVariant};

/// Discounted price: `round_half_up(base * (100 - percent) / 100)`.
pub fn sale_price(base: Money, percent: u8) -> Money {
    base.percent_off(percent)
}

/// Breakdown of a unit price for display next to the add-to-cart button.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    /// Catalog price before discount.
    pub base: Money,
    /// Base after the sale discount; equal to `base` when not on sale.
    pub effective_base: Money,
    /// Variant modifier, zero without a variant.
    pub modifier: Money,
    /// What goes into the cart line.
    pub unit_price: Money,
    /// Undiscounted `base + modifier`, shown struck through when on sale.
    pub list_price: Money,
    /// Active discount percent.
    pub sale_percent: Option<u8>,
}

impl Product {
    pub fn effective_base(&self) -> Money {
        match self.sale().filter(|s| s.is_active()) {
            Some(sale) => sale_price(self.price(), sale.percent),
            None => self.price(),
        }
    }

    fn resolve_variant(&self, variant_id: Option<&VariantId>) -> Result<Option<&ProductVariant>, DomainError> {
        variant_id
            .map(|id| {
                self.variant(id)
                    .ok_or_else(|| DomainError::not_found(format!("variant {id} of product {}", self.id_str())))
            })
            .transpose()
    }

    pub fn quote(&self, variant_id: Option<&VariantId>) -> Result<PriceQuote, DomainError> {
        let modifier = self
            .resolve_variant(variant_id)?
            .map_or(Money::ZERO, |v| v.price_modifier);
        let effective_base = self.effective_base();

        Ok(PriceQuote {
            base: self.price(),
            effective_base,
            modifier,
            unit_price: effective_base + modifier,
            list_price: self.price() + modifier,
            sale_percent: self.sale().filter(|s| s.is_active()).map(|s| s.percent),
        })
    }

    /// Unit price for the selection: `effective_base + modifier`.
    pub fn final_unit_price(&self, variant_id: Option<&VariantId>) -> Result<Money, DomainError> {
        Ok(self.quote(variant_id)?.unit_price)
    }

    /// Candidate cart line for the selection, priced by the policy above.
    ///
    /// Rejects zero quantities, unknown variants and selections that are out
    /// of stock.
    pub fn line_item(&self, variant_id: Option<&VariantId>, quantity: u32) -> Result<LineItem, DomainError> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }

        let variant = self.resolve_variant(variant_id)?;
        if !self.stock_status(variant_id).is_available() {
            return Err(DomainError::validation(format!(
                "{} is out of stock",
                self.id_str()
            )));
        }

        let unit_price = self.final_unit_price(variant_id)?;
        let line = LineItem::new(
            self.id().clone(),
            self.name(),
            unit_price,
            self.unit(),
            quantity,
        );

        Ok(match variant {
            Some(v) => line.with_variant(v.id.clone(), v.name.clone(), v.value.clone()),
            None => line,
        })
    }

    fn id_str(&self) -> &str {
        self.id().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stroymarket_core::{CategoryId, ProductId};

    use crate::product::{NewProduct, Sale};

    fn board(sale: Option<Sale>) -> Product {
        Product::new(NewProduct {
            id: ProductId::new("p003"),
            name: "Доска обрезная 50×150×6000".to_string(),
            category: CategoryId::new("lumber"),
            price: Money::new(320),
            unit: "пог.м".to_string(),
            variants: vec![
                ProductVariant {
                    id: VariantId::new("v1"),
                    name: "Сорт".to_string(),
                    value: "1-й сорт".to_string(),
                    price_modifier: Money::new(80),
                    stock: 200,
                },
                ProductVariant {
                    id: VariantId::new("v3"),
                    name: "Сорт".to_string(),
                    value: "3-й сорт".to_string(),
                    price_modifier: Money::new(-60),
                    stock: 0,
                },
            ],
            stock: 650,
            low_stock_threshold: 50,
            sale,
            ..NewProduct::default()
        })
        .unwrap()
    }

    #[test]
    fn sale_discount_applies_to_base_only() {
        let product = board(Some(Sale { percent: 15 }));
        assert_eq!(product.effective_base(), Money::new(272));
        assert_eq!(product.final_unit_price(None).unwrap(), Money::new(272));
        assert_eq!(product.final_unit_price(Some(&VariantId::new("v1"))).unwrap(), Money::new(352));
    }

    #[test]
    fn no_sale_uses_base_price() {
        let product = board(None);
        assert_eq!(product.final_unit_price(Some(&VariantId::new("v1"))).unwrap(), Money::new(400));
    }

    #[test]
    fn zero_percent_sale_is_ignored() {
        let product = board(Some(Sale { percent: 0 }));
        let quote = product.quote(None).unwrap();
        assert_eq!(quote.unit_price, Money::new(320));
        assert_eq!(quote.sale_percent, None);
    }

    #[test]
    fn quote_reports_list_price_for_strike_through() {
        let quote = board(Some(Sale { percent: 15 })).quote(Some(&VariantId::new("v1"))).unwrap();
        assert_eq!(
            quote,
            PriceQuote {
                base: Money::new(320),
                effective_base: Money::new(272),
                modifier: Money::new(80),
                unit_price: Money::new(352),
                list_price: Money::new(400),
                sale_percent: Some(15),
            }
        );
    }

    #[test]
    fn sale_price_rounds_half_up() {
        // 580 * 0.9 = 522, 85 * 0.85 = 72.25, 290 * 0.85 = 246.5
        assert_eq!(sale_price(Money::new(580), 10), Money::new(522));
        assert_eq!(sale_price(Money::new(85), 15), Money::new(72));
        assert_eq!(sale_price(Money::new(290), 15), Money::new(247));
    }

    #[test]
    fn line_item_snapshots_variant_and_price() {
        let item = board(Some(Sale { percent: 15 }))
            .line_item(Some(&VariantId::new("v1")), 4)
            .unwrap();

        assert_eq!(item.product_id, ProductId::new("p003"));
        assert_eq!(item.price, Money::new(352));
        assert_eq!(item.quantity, 4);
        assert_eq!(item.unit, "пог.м");
        assert_eq!(item.variant_id, Some(VariantId::new("v1")));
        assert_eq!(item.variant_name.as_deref(), Some("Сорт"));
        assert_eq!(item.variant_value.as_deref(), Some("1-й сорт"));
    }

    #[test]
    fn product_card_line_has_no_variant_but_is_discounted() {
        let item = board(Some(Sale { percent: 15 })).line_item(None, 1).unwrap();
        assert_eq!(item.price, Money::new(272));
        assert_eq!(item.variant_id, None);
    }

    #[test]
    fn line_item_rejects_zero_quantity_unknown_variant_and_out_of_stock() {
        let product = board(None);
        assert!(matches!(product.line_item(None, 0), Err(DomainError::Validation(_))));
        assert!(matches!(
            product.line_item(Some(&VariantId::new("v9")), 1),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            product.line_item(Some(&VariantId::new("v3")), 1),
            Err(DomainError::Validation(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        #[test]
        fn discounted_price_never_exceeds_base(base in 0i64..10_000_000, percent in 0u8..=100) {
            let discounted = sale_price(Money::new(base), percent);
            prop_assert!(discounted <= Money::new(base));
            prop_assert!(discounted >= Money::ZERO);
        }

        #[test]
        fn modifier_is_added_after_discount(base in 0i64..100_000, modifier in -50_000i64..50_000, percent in 1u8..=100) {
            let product = Product::new(NewProduct {
                id: ProductId::new("p"),
                name: "X".to_string(),
                price: Money::new(base),
                stock: 1,
                variants: vec![ProductVariant {
                    id: VariantId::new("v"),
                    name: "n".to_string(),
                    value: "v".to_string(),
                    price_modifier: Money::new(modifier),
                    stock: 1,
                }],
                sale: Some(Sale { percent }),
                ..NewProduct::default()
            }).unwrap();

            let price = product.final_unit_price(Some(&VariantId::new("v"))).unwrap();
            prop_assert_eq!(price, sale_price(Money::new(base), percent) + Money::new(modifier));
        }
    }
}
