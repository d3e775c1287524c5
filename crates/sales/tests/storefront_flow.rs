//! Catalog → cart → checkout → back office, end to end.

use chrono::{TimeZone, Utc};

use stroymarket_cart::{CartStore, FileStore, MemoryStore};
use stroymarket_catalog::seed;
use stroymarket_core::{AggregateRoot, Money, ProductId, VariantId};
use stroymarket_sales::{
    ChangeStatus, CheckoutForm, DashboardStats, DeliveryType, OrderBook, OrderCommand, OrderStatus,
    PaymentStatus, RecordPayment, delivery_cost,
};

fn form(delivery: DeliveryType) -> CheckoutForm {
    CheckoutForm {
        name: "Сергей Волков".to_string(),
        phone: "+7 (999) 123-00-00".to_string(),
        email: "volkov@example.ru".to_string(),
        address: Some("г. Москва, ул. Лесная, д. 5".to_string()),
        delivery,
        comment: Some("Позвонить за час".to_string()),
    }
}

#[test]
fn sale_and_variant_pricing_reach_the_order() {
    let catalog = seed::catalog().unwrap();
    let board = catalog.get(&ProductId::new("p003")).unwrap();

    let mut cart = CartStore::open(MemoryStore::new());
    cart.add_item(board.line_item(Some(&VariantId::new("v1")), 4).unwrap()).unwrap();
    cart.add_item(board.line_item(None, 1).unwrap()).unwrap();
    assert_eq!(cart.total(), Money::new(352 * 4 + 272));

    let mut book = OrderBook::new();
    let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
    let order = book.checkout(&mut cart, &form(DeliveryType::Delivery), now).unwrap();

    assert_eq!(order.number(), "2024-001");
    assert_eq!(order.goods_amount(), Money::new(1680));
    assert_eq!(order.delivery_amount(), Money::new(1500));
    assert_eq!(order.total_amount(), Money::new(3180));
    assert_eq!(order.items()[0].variant_name.as_deref(), Some("1-й сорт"));
    assert_eq!(order.comment(), Some("Позвонить за час"));
    assert!(cart.is_empty());
}

#[test]
fn large_order_ships_free_and_numbers_follow_the_seed() {
    let catalog = seed::catalog().unwrap();
    let drill = catalog.get(&ProductId::new("p007")).unwrap();

    let mut cart = CartStore::open(MemoryStore::new());
    cart.add_item(drill.line_item(Some(&VariantId::new("v2")), 4).unwrap()).unwrap();
    assert_eq!(cart.total(), Money::new(16_490 * 4));

    let mut book = stroymarket_sales::seed::orders().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
    let order_id = book
        .checkout(&mut cart, &form(DeliveryType::Delivery), now)
        .map(|o| o.id().clone())
        .unwrap();

    let order = book.get(&order_id).unwrap();
    assert_eq!(order.number(), "2024-005");
    assert_eq!(order.delivery_amount(), Money::ZERO);
    assert_eq!(book.pending_count(), 2);
    assert_eq!(book.recent(1)[0].id(), &order_id);
}

#[test]
fn checkout_clears_the_persisted_cart() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = seed::catalog().unwrap();
    let cement = catalog.get(&ProductId::new("p001")).unwrap();

    {
        let mut cart = CartStore::open(FileStore::new(dir.path()));
        cart.add_item(cement.line_item(Some(&VariantId::new("v2")), 10).unwrap()).unwrap();
    }

    let mut cart = CartStore::open(FileStore::new(dir.path()));
    assert_eq!(cart.count(), 10);

    let mut book = OrderBook::new();
    book.checkout(&mut cart, &form(DeliveryType::Pickup), Utc::now()).unwrap();

    let reopened = CartStore::open(FileStore::new(dir.path()));
    assert!(reopened.is_empty());
}

#[test]
fn back_office_status_and_payment_flow_feeds_the_dashboard() {
    let catalog = seed::catalog().unwrap();
    let mut book = stroymarket_sales::seed::orders().unwrap();
    let before = DashboardStats::collect(&book, &catalog);

    let id = book.get_by_number("2024-004").map(|o| o.id().clone()).unwrap();
    for command in [
        OrderCommand::ChangeStatus(ChangeStatus {
            order_id: id.clone(),
            status: OrderStatus::Shipped,
            occurred_at: Utc::now(),
        }),
        OrderCommand::RecordPayment(RecordPayment {
            order_id: id.clone(),
            status: PaymentStatus::Paid,
            occurred_at: Utc::now(),
        }),
    ] {
        book.execute(&id, &command).unwrap();
    }

    let after = DashboardStats::collect(&book, &catalog);
    assert_eq!(after.pending_orders, before.pending_orders - 1);
    assert_eq!(after.revenue, before.revenue + Money::new(7_900));
    assert!(after.by_status.contains(&(OrderStatus::Shipped, 1)));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn delivery_is_free_exactly_from_the_threshold(total in 0i64..200_000) {
            let cost = delivery_cost(DeliveryType::Delivery, Money::new(total));
            if total >= 50_000 {
                prop_assert_eq!(cost, Money::ZERO);
            } else {
                prop_assert_eq!(cost, Money::new(1500));
            }
            prop_assert_eq!(delivery_cost(DeliveryType::Pickup, Money::new(total)), Money::ZERO);
        }
    }
}
