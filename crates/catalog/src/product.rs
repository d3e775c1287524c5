use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stroymarket_core::{
    Aggregate, AggregateRoot, CategoryId, DomainError, Entity, Money, ProductId, VariantId,
};
use stroymarket_events::Event;

/// Catalog category (top-level navigation entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Icon name used by the navigation.
    pub icon: String,
    /// Advertised number of items in the category.
    pub count: u32,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A purchasable variation of a product (size, colour, grade, packaging).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    /// Dimension label, e.g. "Фасовка".
    pub name: String,
    /// Value label, e.g. "25 кг".
    pub value: String,
    /// Signed adjustment added to the product's effective base price.
    pub price_modifier: Money,
    pub stock: u32,
}

impl Entity for ProductVariant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Percentage discount on the product's base price.
///
/// A sale of 0 % is stored as given but never treated as "on sale".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub percent: u8,
}

impl Sale {
    pub fn percent(percent: u8) -> Result<Self, DomainError> {
        if percent > 100 {
            return Err(DomainError::validation(format!(
                "sale percent must be within 0..=100, got {percent}"
            )));
        }
        Ok(Self { percent })
    }

    pub fn is_active(&self) -> bool {
        self.percent > 0
    }
}

/// Input for [`Product::new`]. Fields not relevant to a product are left at
/// their defaults.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub category: CategoryId,
    pub subcategory: String,
    pub price: Money,
    pub unit: String,
    pub description: String,
    pub specs: Vec<(String, String)>,
    pub variants: Vec<ProductVariant>,
    pub stock: u32,
    pub low_stock_threshold: u32,
    pub sku: String,
    pub brand: String,
    pub tags: Vec<String>,
    pub rating: f32,
    pub review_count: u32,
    pub is_new: bool,
    pub sale: Option<Sale>,
    pub weight_kg: Option<f64>,
}

/// Aggregate root: Product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    category: CategoryId,
    subcategory: String,
    price: Money,
    unit: String,
    description: String,
    specs: Vec<(String, String)>,
    variants: Vec<ProductVariant>,
    stock: u32,
    low_stock_threshold: u32,
    sku: String,
    brand: String,
    tags: Vec<String>,
    rating: f32,
    review_count: u32,
    is_new: bool,
    sale: Option<Sale>,
    weight_kg: Option<f64>,
    #[serde(skip)]
    version: u64,
}

impl Product {
    /// Build a catalog product, checking the data invariants the pricing
    /// policy relies on.
    pub fn new(input: NewProduct) -> Result<Self, DomainError> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation(format!("product {}: name cannot be empty", input.id)));
        }
        if input.price < Money::ZERO {
            return Err(DomainError::validation(format!(
                "product {}: price cannot be negative",
                input.id
            )));
        }
        if let Some(sale) = input.sale {
            Sale::percent(sale.percent)?;
        }
        for (idx, variant) in input.variants.iter().enumerate() {
            if input.variants[..idx].iter().any(|v| v.id == variant.id) {
                return Err(DomainError::invariant(format!(
                    "product {}: duplicate variant id {}",
                    input.id, variant.id
                )));
            }
        }

        Ok(Self {
            id: input.id,
            name: input.name,
            category: input.category,
            subcategory: input.subcategory,
            price: input.price,
            unit: input.unit,
            description: input.description,
            specs: input.specs,
            variants: input.variants,
            stock: input.stock,
            low_stock_threshold: input.low_stock_threshold,
            sku: input.sku,
            brand: input.brand,
            tags: input.tags,
            rating: input.rating,
            review_count: input.review_count,
            is_new: input.is_new,
            sale: input.sale,
            weight_kg: input.weight_kg,
            version: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &CategoryId {
        &self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    /// Base price before discounts and variant modifiers.
    pub fn price(&self) -> Money {
        self.price
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Technical characteristics in display order.
    pub fn specs(&self) -> &[(String, String)] {
        &self.specs
    }

    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        stroymarket_core::find_by_id(&self.variants, id)
    }

    /// The variant preselected on the product page.
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn low_stock_threshold(&self) -> u32 {
        self.low_stock_threshold
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn rating(&self) -> f32 {
        self.rating
    }

    pub fn review_count(&self) -> u32 {
        self.review_count
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// The configured sale, including an inactive 0 % one.
    pub fn sale(&self) -> Option<Sale> {
        self.sale
    }

    /// `true` when the product carries a non-zero discount.
    pub fn is_on_sale(&self) -> bool {
        self.sale.is_some_and(|s| s.is_active())
    }

    pub fn weight_kg(&self) -> Option<f64> {
        self.weight_kg
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: UpdateStock.
///
/// Targets the product-level stock, or one variant's stock when
/// `variant_id` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStock {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub stock: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdatePricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePricing {
    pub product_id: ProductId,
    pub price: Money,
    pub sale: Option<Sale>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateDetails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDetails {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCommand {
    UpdateStock(UpdateStock),
    UpdatePricing(UpdatePricing),
    UpdateDetails(UpdateDetails),
}

impl ProductCommand {
    pub fn product_id(&self) -> &ProductId {
        match self {
            ProductCommand::UpdateStock(c) => &c.product_id,
            ProductCommand::UpdatePricing(c) => &c.product_id,
            ProductCommand::UpdateDetails(c) => &c.product_id,
        }
    }
}

/// Event: StockUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdated {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub from: u32,
    pub to: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PricingUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingUpdated {
    pub product_id: ProductId,
    pub price: Money,
    pub sale: Option<Sale>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DetailsUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsUpdated {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductEvent {
    StockUpdated(StockUpdated),
    PricingUpdated(PricingUpdated),
    DetailsUpdated(DetailsUpdated),
}

impl Event for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::StockUpdated(_) => "catalog.product.stock_updated",
            ProductEvent::PricingUpdated(_) => "catalog.product.pricing_updated",
            ProductEvent::DetailsUpdated(_) => "catalog.product.details_updated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::StockUpdated(e) => e.occurred_at,
            ProductEvent::PricingUpdated(e) => e.occurred_at,
            ProductEvent::DetailsUpdated(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::StockUpdated(e) => match &e.variant_id {
                Some(variant_id) => {
                    if let Some(v) = self.variants.iter_mut().find(|v| &v.id == variant_id) {
                        v.stock = e.to;
                    }
                }
                None => self.stock = e.to,
            },
            ProductEvent::PricingUpdated(e) => {
                self.price = e.price;
                self.sale = e.sale;
            }
            ProductEvent::DetailsUpdated(e) => {
                self.name = e.name.clone();
                self.description = e.description.clone();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        self.ensure_product_id(command.product_id())?;
        match command {
            ProductCommand::UpdateStock(cmd) => self.handle_update_stock(cmd),
            ProductCommand::UpdatePricing(cmd) => self.handle_update_pricing(cmd),
            ProductCommand::UpdateDetails(cmd) => self.handle_update_details(cmd),
        }
    }
}

impl Product {
    fn ensure_product_id(&self, product_id: &ProductId) -> Result<(), DomainError> {
        if &self.id != product_id {
            return Err(DomainError::invariant("product_id mismatch"));
        }
        Ok(())
    }

    fn handle_update_stock(&self, cmd: &UpdateStock) -> Result<Vec<ProductEvent>, DomainError> {
        let from = match &cmd.variant_id {
            Some(variant_id) => {
                self.variant(variant_id)
                    .ok_or_else(|| DomainError::not_found(format!("variant {variant_id} of {}", self.id)))?
                    .stock
            }
            None => self.stock,
        };

        if from == cmd.stock {
            return Ok(vec![]);
        }

        Ok(vec![ProductEvent::StockUpdated(StockUpdated {
            product_id: cmd.product_id.clone(),
            variant_id: cmd.variant_id.clone(),
            from,
            to: cmd.stock,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_pricing(&self, cmd: &UpdatePricing) -> Result<Vec<ProductEvent>, DomainError> {
        if cmd.price < Money::ZERO {
            return Err(DomainError::validation("price cannot be negative"));
        }
        if let Some(sale) = cmd.sale {
            Sale::percent(sale.percent)?;
        }

        if cmd.price == self.price && cmd.sale == self.sale {
            return Ok(vec![]);
        }

        Ok(vec![ProductEvent::PricingUpdated(PricingUpdated {
            product_id: cmd.product_id.clone(),
            price: cmd.price,
            sale: cmd.sale,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_details(&self, cmd: &UpdateDetails) -> Result<Vec<ProductEvent>, DomainError> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        if name == self.name && cmd.description == self.description {
            return Ok(vec![]);
        }

        Ok(vec![ProductEvent::DetailsUpdated(DetailsUpdated {
            product_id: cmd.product_id.clone(),
            name: name.to_string(),
            description: cmd.description.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn board() -> Product {
        Product::new(NewProduct {
            id: ProductId::new("p003"),
            name: "Доска обрезная".to_string(),
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
                    id: VariantId::new("v2"),
                    name: "Сорт".to_string(),
                    value: "2-й сорт".to_string(),
                    price_modifier: Money::ZERO,
                    stock: 650,
                },
            ],
            stock: 650,
            low_stock_threshold: 50,
            sale: Some(Sale { percent: 15 }),
            ..NewProduct::default()
        })
        .unwrap()
    }

    #[test]
    fn new_product_rejects_blank_name() {
        let err = Product::new(NewProduct {
            id: ProductId::new("p1"),
            name: "  ".to_string(),
            ..NewProduct::default()
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_product_rejects_sale_above_hundred_percent() {
        let err = Product::new(NewProduct {
            id: ProductId::new("p1"),
            name: "X".to_string(),
            sale: Some(Sale { percent: 101 }),
            ..NewProduct::default()
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_product_rejects_duplicate_variant_ids() {
        let mut input = NewProduct {
            id: ProductId::new("p1"),
            name: "X".to_string(),
            ..NewProduct::default()
        };
        let variant = board().variants()[0].clone();
        input.variants = vec![variant.clone(), variant];

        let err = Product::new(input).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn zero_percent_sale_is_not_on_sale() {
        let mut input = NewProduct {
            id: ProductId::new("p1"),
            name: "X".to_string(),
            sale: Some(Sale { percent: 0 }),
            ..NewProduct::default()
        };
        assert!(!Product::new(input.clone()).unwrap().is_on_sale());

        input.sale = Some(Sale { percent: 5 });
        assert!(Product::new(input).unwrap().is_on_sale());
    }

    #[test]
    fn update_stock_emits_event_with_previous_value() {
        let mut product = board();
        let cmd = ProductCommand::UpdateStock(UpdateStock {
            product_id: ProductId::new("p003"),
            variant_id: None,
            stock: 0,
            occurred_at: test_time(),
        });

        let events = product.handle(&cmd).unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            ProductEvent::StockUpdated(e) => {
                assert_eq!(e.from, 650);
                assert_eq!(e.to, 0);
            }
            _ => panic!("Expected StockUpdated event"),
        }

        product.apply(&events[0]);
        assert_eq!(product.stock(), 0);
        assert_eq!(product.version(), 1);
    }

    #[test]
    fn update_stock_targets_a_single_variant() {
        let mut product = board();
        let cmd = ProductCommand::UpdateStock(UpdateStock {
            product_id: ProductId::new("p003"),
            variant_id: Some(VariantId::new("v1")),
            stock: 3,
            occurred_at: test_time(),
        });

        for event in product.handle(&cmd).unwrap() {
            product.apply(&event);
        }
        assert_eq!(product.variant(&VariantId::new("v1")).unwrap().stock, 3);
        assert_eq!(product.stock(), 650);
    }

    #[test]
    fn update_stock_for_unknown_variant_is_not_found() {
        let cmd = ProductCommand::UpdateStock(UpdateStock {
            product_id: ProductId::new("p003"),
            variant_id: Some(VariantId::new("v9")),
            stock: 3,
            occurred_at: test_time(),
        });
        assert!(matches!(board().handle(&cmd), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn unchanged_stock_emits_nothing() {
        let cmd = ProductCommand::UpdateStock(UpdateStock {
            product_id: ProductId::new("p003"),
            variant_id: None,
            stock: 650,
            occurred_at: test_time(),
        });
        assert!(board().handle(&cmd).unwrap().is_empty());
    }

    #[test]
    fn command_for_another_product_is_rejected() {
        let cmd = ProductCommand::UpdateStock(UpdateStock {
            product_id: ProductId::new("p999"),
            variant_id: None,
            stock: 1,
            occurred_at: test_time(),
        });
        assert!(matches!(board().handle(&cmd), Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn update_pricing_validates_and_applies() {
        let mut product = board();

        let bad = ProductCommand::UpdatePricing(UpdatePricing {
            product_id: ProductId::new("p003"),
            price: Money::new(-1),
            sale: None,
            occurred_at: test_time(),
        });
        assert!(matches!(product.handle(&bad), Err(DomainError::Validation(_))));

        let bad_sale = ProductCommand::UpdatePricing(UpdatePricing {
            product_id: ProductId::new("p003"),
            price: Money::new(300),
            sale: Some(Sale { percent: 150 }),
            occurred_at: test_time(),
        });
        assert!(matches!(product.handle(&bad_sale), Err(DomainError::Validation(_))));

        let ok = ProductCommand::UpdatePricing(UpdatePricing {
            product_id: ProductId::new("p003"),
            price: Money::new(300),
            sale: None,
            occurred_at: test_time(),
        });
        for event in product.handle(&ok).unwrap() {
            product.apply(&event);
        }
        assert_eq!(product.price(), Money::new(300));
        assert!(!product.is_on_sale());
    }

    #[test]
    fn update_details_trims_name_and_rejects_blank() {
        let mut product = board();

        let blank = ProductCommand::UpdateDetails(UpdateDetails {
            product_id: ProductId::new("p003"),
            name: "   ".to_string(),
            description: String::new(),
            occurred_at: test_time(),
        });
        assert!(matches!(product.handle(&blank), Err(DomainError::Validation(_))));

        let cmd = ProductCommand::UpdateDetails(UpdateDetails {
            product_id: ProductId::new("p003"),
            name: "  Доска 50×150  ".to_string(),
            description: "Камерная сушка".to_string(),
            occurred_at: test_time(),
        });
        let events = product.handle(&cmd).unwrap();
        assert_eq!(events[0].event_type(), "catalog.product.details_updated");
        product.apply(&events[0]);
        assert_eq!(product.name(), "Доска 50×150");
        assert_eq!(product.description(), "Камерная сушка");
    }
}
