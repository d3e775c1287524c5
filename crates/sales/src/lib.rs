//! Sales domain module.
//!
//! Checkout (delivery pricing, turning the cart into an order), the order
//! aggregate and its back-office commands, the order repository and the
//! dashboard numbers derived from orders and catalog stock.

pub mod checkout;
pub mod dashboard;
pub mod order;
pub mod order_book;
pub mod seed;

pub use checkout::{
    CheckoutForm, CheckoutSummary, DELIVERY_FEE, FREE_DELIVERY_THRESHOLD, checkout, delivery_cost,
};
pub use dashboard::DashboardStats;
pub use order::{
    AssignTracking, ChangeStatus, Customer, DeliveryType, Order, OrderCommand, OrderEvent,
    OrderItem, OrderPlaced, OrderStatus, PaymentRecorded, PaymentStatus, PlaceOrder,
    RecordPayment, StatusChanged, TrackingAssigned,
};
pub use order_book::OrderBook;
