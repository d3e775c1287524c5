//! Cart line items and their identity key.

use serde::{Deserialize, Serialize};

use stroymarket_core::{Money, ProductId, ValueObject, VariantId};

/// One row of the cart: a product (and optional variant), a locked-in unit
/// price and a quantity.
///
/// Names, variant labels, price and unit are a snapshot taken when the item
/// was first added; they are never re-derived from the catalog.
///
/// Serialized with camelCase keys; absent variant fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub product_name: String,
    /// Unit price at add time.
    pub price: Money,
    /// Pricing unit label, e.g. "мешок 50кг" or "пог.м".
    pub unit: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_value: Option<String>,
}

impl LineItem {
    /// A line for a product without a selected variant.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        price: Money,
        unit: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            price,
            unit: unit.into(),
            quantity,
            variant_id: None,
            variant_name: None,
            variant_value: None,
        }
    }

    /// Attach a variant selection (id plus its display labels).
    pub fn with_variant(
        mut self,
        variant_id: VariantId,
        variant_name: impl Into<String>,
        variant_value: impl Into<String>,
    ) -> Self {
        self.variant_id = Some(variant_id);
        self.variant_name = Some(variant_name.into());
        self.variant_value = Some(variant_value.into());
        self
    }

    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.variant_id.clone())
    }

    /// `price * quantity`.
    pub fn subtotal(&self) -> Money {
        self.price.times(u64::from(self.quantity))
    }
}

/// Identity of a cart row: `(product id, variant id)`.
///
/// An empty variant id is the same as no variant. Equality is structural, so
/// ids containing `-` cannot collide the way the rendered form could.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variant_id: Option<VariantId>,
}

impl ValueObject for LineKey {}

impl LineKey {
    pub fn new(product_id: ProductId, variant_id: Option<VariantId>) -> Self {
        Self {
            product_id,
            variant_id: variant_id.filter(|v| !v.as_str().is_empty()),
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn variant_id(&self) -> Option<&VariantId> {
        self.variant_id.as_ref()
    }

    pub fn matches(&self, item: &LineItem) -> bool {
        item.product_id == self.product_id
            && item.variant_id.as_ref().filter(|v| !v.as_str().is_empty()) == self.variant_id.as_ref()
    }
}

/// `"{productId}-{variantId}"`, with an empty variant part when absent.
impl core::fmt::Display for LineKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.variant_id {
            Some(v) => write!(f, "{}-{}", self.product_id, v),
            None => write!(f, "{}-", self.product_id),
        }
    }
}
