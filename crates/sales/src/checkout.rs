//! Turning the cart into an order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use stroymarket_cart::{CartStore, CartTotals, KeyValueStore};
use stroymarket_core::{DomainError, Money, OrderId};
use stroymarket_events::execute;

use crate::order::{Customer, DeliveryType, Order, OrderCommand, OrderItem, PlaceOrder};

/// Flat delivery charge within the service area.
pub const DELIVERY_FEE: Money = Money::new(1500);

/// Goods total from which delivery is free.
pub const FREE_DELIVERY_THRESHOLD: Money = Money::new(50_000);

/// Pickup is free; delivery costs [`DELIVERY_FEE`] unless the goods total
/// reaches [`FREE_DELIVERY_THRESHOLD`].
pub fn delivery_cost(delivery: DeliveryType, goods_total: Money) -> Money {
    match delivery {
        DeliveryType::Pickup => Money::ZERO,
        DeliveryType::Delivery if goods_total >= FREE_DELIVERY_THRESHOLD => Money::ZERO,
        DeliveryType::Delivery => DELIVERY_FEE,
    }
}

/// Order summary shown next to the checkout form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub goods: Money,
    pub count: u64,
    pub delivery: Money,
    pub total: Money,
}

impl CheckoutSummary {
    pub fn new(totals: CartTotals, delivery: DeliveryType) -> Self {
        let delivery = delivery_cost(delivery, totals.total);
        Self {
            goods: totals.total,
            count: totals.count,
            delivery,
            total: totals.total + delivery,
        }
    }
}

/// Contact and delivery details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub delivery: DeliveryType,
    pub comment: Option<String>,
}

impl CheckoutForm {
    /// Name and phone are required; so is an address when delivering.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if self.phone.trim().is_empty() {
            return Err(DomainError::validation("phone is required"));
        }
        if self.delivery == DeliveryType::Delivery && non_blank(self.address.as_deref()).is_none() {
            return Err(DomainError::validation("delivery address is required"));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Place an order for everything in the cart, then empty the cart.
///
/// The cart is left untouched when the form is invalid or the cart is empty.
pub fn checkout<S: KeyValueStore>(
    cart: &mut CartStore<S>,
    form: &CheckoutForm,
    number: impl Into<String>,
    now: DateTime<Utc>,
) -> Result<Order, DomainError> {
    if cart.is_empty() {
        return Err(DomainError::validation("cannot check out an empty cart"));
    }
    form.validate()?;

    let summary = CheckoutSummary::new(cart.totals(), form.delivery);
    let order_id = OrderId::generate();
    let command = OrderCommand::PlaceOrder(PlaceOrder {
        order_id: order_id.clone(),
        number: number.into(),
        customer: Customer {
            id: None,
            name: form.name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            email: form.email.trim().to_string(),
        },
        items: cart.items().iter().map(OrderItem::from).collect(),
        delivery_type: form.delivery,
        delivery_address: match form.delivery {
            DeliveryType::Delivery => non_blank(form.address.as_deref()),
            DeliveryType::Pickup => None,
        },
        delivery_amount: summary.delivery,
        total_amount: summary.total,
        comment: non_blank(form.comment.as_deref()),
        occurred_at: now,
    });

    let mut order = Order::empty(order_id);
    execute(&mut order, &command)?;
    cart.clear_cart();

    info!(
        order = order.number(),
        lines = order.items().len(),
        goods = summary.goods.amount(),
        delivery = summary.delivery.amount(),
        total = summary.total.amount(),
        "order placed from cart"
    );

    Ok(order)
}
