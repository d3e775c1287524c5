//! Demo dataset: the back office's sample orders.

use chrono::{DateTime, TimeZone, Utc};

use stroymarket_core::{CustomerId, DomainError, Money, OrderId, ProductId};
use stroymarket_events::execute;

use crate::order::{
    AssignTracking, ChangeStatus, Customer, DeliveryType, Order, OrderCommand, OrderItem,
    OrderStatus, PaymentStatus, PlaceOrder, RecordPayment,
};
use crate::order_book::OrderBook;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<DateTime<Utc>, DomainError> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .ok_or_else(|| DomainError::invariant(format!("invalid seed timestamp {year}-{month}-{day}")))
}

fn item(product: &str, name: &str, variant: &str, quantity: u32, price: i64, unit: &str) -> OrderItem {
    OrderItem {
        product_id: ProductId::new(product),
        product_name: name.to_string(),
        variant_name: Some(variant.to_string()),
        quantity,
        price: Money::new(price),
        unit: unit.to_string(),
    }
}

fn customer(id: &str, name: &str, email: &str, phone: &str) -> Customer {
    Customer {
        id: Some(CustomerId::new(id)),
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
    }
}

struct SeedOrder {
    place: PlaceOrder,
    status: OrderStatus,
    payment: PaymentStatus,
    tracking: Option<&'static str>,
    updated_at: DateTime<Utc>,
}

impl SeedOrder {
    fn build(self) -> Result<Order, DomainError> {
        let id = self.place.order_id.clone();
        let mut order = Order::empty(id.clone());
        execute(&mut order, &OrderCommand::PlaceOrder(self.place))?;

        if self.payment != PaymentStatus::Unpaid {
            execute(
                &mut order,
                &OrderCommand::RecordPayment(RecordPayment {
                    order_id: id.clone(),
                    status: self.payment,
                    occurred_at: self.updated_at,
                }),
            )?;
        }
        if let Some(tracking) = self.tracking {
            execute(
                &mut order,
                &OrderCommand::AssignTracking(AssignTracking {
                    order_id: id.clone(),
                    tracking_number: tracking.to_string(),
                    occurred_at: self.updated_at,
                }),
            )?;
        }
        if self.status != OrderStatus::Pending {
            execute(
                &mut order,
                &OrderCommand::ChangeStatus(ChangeStatus {
                    order_id: id,
                    status: self.status,
                    occurred_at: self.updated_at,
                }),
            )?;
        }
        Ok(order)
    }
}

/// The four sample orders, with the totals they were recorded with.
pub fn orders() -> Result<OrderBook, DomainError> {
    let seeds = vec![
        SeedOrder {
            place: PlaceOrder {
                order_id: OrderId::new("o001"),
                number: "2024-001".to_string(),
                customer: customer("u001", "Александр Петров", "a.petrov@mail.ru", "+7 (916) 123-45-67"),
                items: vec![
                    item("p001", "Цемент М500 Д0", "50 кг", 20, 480, "мешок"),
                    item("p007", "Арматура А500С 12мм", "12 мм", 100, 85, "пог.м"),
                ],
                delivery_type: DeliveryType::Delivery,
                delivery_address: Some("г. Москва, ул. Строителей, д. 14".to_string()),
                delivery_amount: Money::new(1500),
                total_amount: Money::new(18_100),
                comment: None,
                occurred_at: at(2024, 3, 10, 10, 30)?,
            },
            status: OrderStatus::Delivered,
            payment: PaymentStatus::Paid,
            tracking: Some("MSK-2024-001-TRK"),
            updated_at: at(2024, 3, 13, 14, 20)?,
        },
        SeedOrder {
            place: PlaceOrder {
                order_id: OrderId::new("o002"),
                number: "2024-002".to_string(),
                customer: customer("u002", "ООО СтройГрупп", "info@stroigroup.ru", "+7 (495) 987-65-43"),
                items: vec![item("p002", "Кирпич рядовой полнотелый", "Красный", 5000, 18, "шт")],
                delivery_type: DeliveryType::Delivery,
                delivery_address: Some("Московская обл., г. Одинцово, ул. Советская, 22".to_string()),
                delivery_amount: Money::new(2500),
                total_amount: Money::new(92_500),
                comment: None,
                occurred_at: at(2024, 3, 12, 9, 15)?,
            },
            status: OrderStatus::Processing,
            payment: PaymentStatus::Paid,
            tracking: None,
            updated_at: at(2024, 3, 12, 11, 0)?,
        },
        SeedOrder {
            place: PlaceOrder {
                order_id: OrderId::new("o003"),
                number: "2024-003".to_string(),
                customer: customer("u003", "Дмитрий Иванов", "d.ivanov@gmail.com", "+7 (926) 555-11-22"),
                items: vec![
                    item("p005", "Минвата ROCKWOOL Лайт Баттс", "100 мм", 10, 2840, "упак."),
                    item("p006", "Профнастил С20", "RAL 6005", 30, 600, "м²"),
                ],
                delivery_type: DeliveryType::Pickup,
                delivery_address: None,
                delivery_amount: Money::ZERO,
                total_amount: Money::new(46_400),
                comment: None,
                occurred_at: at(2024, 3, 14, 16, 40)?,
            },
            status: OrderStatus::Confirmed,
            payment: PaymentStatus::Paid,
            tracking: None,
            updated_at: at(2024, 3, 14, 17, 10)?,
        },
        SeedOrder {
            place: PlaceOrder {
                order_id: OrderId::new("o004"),
                number: "2024-004".to_string(),
                customer: customer("u004", "Марина Козлова", "m.kozlova@yandex.ru", "+7 (903) 777-88-99"),
                items: vec![
                    item("p008", "Клей плиточный UNIS Горизонт", "25 кг", 5, 290, "мешок"),
                    item("p003", "Доска обрезная", "2-й сорт", 20, 320, "пог.м"),
                ],
                delivery_type: DeliveryType::Delivery,
                delivery_address: Some("г. Москва, пр-т Мира, д. 88, кв. 12".to_string()),
                delivery_amount: Money::new(800),
                total_amount: Money::new(7_900),
                comment: None,
                occurred_at: at(2024, 3, 15, 11, 20)?,
            },
            status: OrderStatus::Pending,
            payment: PaymentStatus::Unpaid,
            tracking: None,
            updated_at: at(2024, 3, 15, 11, 20)?,
        },
    ];

    let mut book = OrderBook::new();
    for seed in seeds {
        book.place(seed.build()?)?;
    }
    Ok(book)
}
