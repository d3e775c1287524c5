use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stroymarket_cart::LineItem;
use stroymarket_core::{Aggregate, AggregateRoot, CustomerId, DomainError, Money, OrderId, ProductId};
use stroymarket_events::Event;

/// Order fulfilment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Label shown in the back office.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Ожидает",
            OrderStatus::Confirmed => "Подтверждён",
            OrderStatus::Processing => "В обработке",
            OrderStatus::Shipped => "Отправлен",
            OrderStatus::Delivered => "Доставлен",
            OrderStatus::Cancelled => "Отменён",
        }
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| DomainError::validation(format!("unknown order status: {s}")))
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    Pickup,
    Delivery,
}

/// Ordered line: a snapshot of the cart line at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    /// Variant value label, e.g. "50 кг".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    pub quantity: u32,
    pub price: Money,
    pub unit: String,
}

impl OrderItem {
    pub fn subtotal(&self) -> Money {
        self.price.times(u64::from(self.quantity))
    }
}

impl From<&LineItem> for OrderItem {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.product_id.clone(),
            product_name: line.product_name.clone(),
            variant_name: line.variant_value.clone(),
            quantity: line.quantity,
            price: line.price,
            unit: line.unit.clone(),
        }
    }
}

/// Who placed the order and how to reach them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Set for registered customers.
    pub id: Option<CustomerId>,
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Aggregate root: Order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: OrderId,
    number: String,
    customer: Customer,
    items: Vec<OrderItem>,
    status: OrderStatus,
    payment_status: PaymentStatus,
    delivery_type: DeliveryType,
    delivery_address: Option<String>,
    total_amount: Money,
    delivery_amount: Money,
    comment: Option<String>,
    tracking_number: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    version: u64,
    #[serde(skip)]
    placed: bool,
}

impl Order {
    /// Create an empty, not-yet-placed aggregate instance.
    pub fn empty(id: OrderId) -> Self {
        Self {
            id,
            number: String::new(),
            customer: Customer::default(),
            items: Vec::new(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            delivery_type: DeliveryType::Pickup,
            delivery_address: None,
            total_amount: Money::ZERO,
            delivery_amount: Money::ZERO,
            comment: None,
            tracking_number: None,
            created_at: None,
            updated_at: None,
            version: 0,
            placed: false,
        }
    }

    /// Human-facing number, e.g. "2024-005".
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    pub fn delivery_type(&self) -> DeliveryType {
        self.delivery_type
    }

    pub fn delivery_address(&self) -> Option<&str> {
        self.delivery_address.as_deref()
    }

    /// Amount charged, delivery included.
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn delivery_amount(&self) -> Money {
        self.delivery_amount
    }

    /// Σ of the line subtotals.
    pub fn goods_amount(&self) -> Money {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: PlaceOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub order_id: OrderId,
    pub number: String,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub delivery_type: DeliveryType,
    pub delivery_address: Option<String>,
    pub delivery_amount: Money,
    /// Amount charged; checkout sets it to goods + delivery.
    pub total_amount: Money,
    pub comment: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ChangeStatus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStatus {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordPayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayment {
    pub order_id: OrderId,
    pub status: PaymentStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AssignTracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignTracking {
    pub order_id: OrderId,
    pub tracking_number: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    PlaceOrder(PlaceOrder),
    ChangeStatus(ChangeStatus),
    RecordPayment(RecordPayment),
    AssignTracking(AssignTracking),
}

impl OrderCommand {
    fn order_id(&self) -> &OrderId {
        match self {
            OrderCommand::PlaceOrder(c) => &c.order_id,
            OrderCommand::ChangeStatus(c) => &c.order_id,
            OrderCommand::RecordPayment(c) => &c.order_id,
            OrderCommand::AssignTracking(c) => &c.order_id,
        }
    }
}

/// Event: OrderPlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub number: String,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub delivery_type: DeliveryType,
    pub delivery_address: Option<String>,
    pub delivery_amount: Money,
    pub total_amount: Money,
    pub comment: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecorded {
    pub order_id: OrderId,
    pub from: PaymentStatus,
    pub to: PaymentStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TrackingAssigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingAssigned {
    pub order_id: OrderId,
    pub tracking_number: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderPlaced(OrderPlaced),
    StatusChanged(StatusChanged),
    PaymentRecorded(PaymentRecorded),
    TrackingAssigned(TrackingAssigned),
}

impl OrderEvent {
    pub fn order_id(&self) -> &OrderId {
        match self {
            OrderEvent::OrderPlaced(e) => &e.order_id,
            OrderEvent::StatusChanged(e) => &e.order_id,
            OrderEvent::PaymentRecorded(e) => &e.order_id,
            OrderEvent::TrackingAssigned(e) => &e.order_id,
        }
    }
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "sales.order.placed",
            OrderEvent::StatusChanged(_) => "sales.order.status_changed",
            OrderEvent::PaymentRecorded(_) => "sales.order.payment_recorded",
            OrderEvent::TrackingAssigned(_) => "sales.order.tracking_assigned",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderPlaced(e) => e.occurred_at,
            OrderEvent::StatusChanged(e) => e.occurred_at,
            OrderEvent::PaymentRecorded(e) => e.occurred_at,
            OrderEvent::TrackingAssigned(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderPlaced(e) => {
                self.id = e.order_id.clone();
                self.number = e.number.clone();
                self.customer = e.customer.clone();
                self.items = e.items.clone();
                self.status = OrderStatus::Pending;
                self.payment_status = PaymentStatus::Unpaid;
                self.delivery_type = e.delivery_type;
                self.delivery_address = e.delivery_address.clone();
                self.delivery_amount = e.delivery_amount;
                self.total_amount = e.total_amount;
                self.comment = e.comment.clone();
                self.created_at = Some(e.occurred_at);
                self.placed = true;
            }
            OrderEvent::StatusChanged(e) => {
                self.status = e.to;
            }
            OrderEvent::PaymentRecorded(e) => {
                self.payment_status = e.to;
            }
            OrderEvent::TrackingAssigned(e) => {
                self.tracking_number = Some(e.tracking_number.clone());
            }
        }

        self.updated_at = Some(event.occurred_at());
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        self.ensure_order_id(command.order_id())?;
        match command {
            OrderCommand::PlaceOrder(cmd) => self.handle_place(cmd),
            OrderCommand::ChangeStatus(cmd) => self.handle_change_status(cmd),
            OrderCommand::RecordPayment(cmd) => self.handle_record_payment(cmd),
            OrderCommand::AssignTracking(cmd) => self.handle_assign_tracking(cmd),
        }
    }
}

impl Order {
    fn ensure_order_id(&self, order_id: &OrderId) -> Result<(), DomainError> {
        if &self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn ensure_placed(&self) -> Result<(), DomainError> {
        if !self.placed {
            return Err(DomainError::not_found(format!("order {}", self.id)));
        }
        Ok(())
    }

    fn handle_place(&self, cmd: &PlaceOrder) -> Result<Vec<OrderEvent>, DomainError> {
        if self.placed {
            return Err(DomainError::conflict("order already placed"));
        }
        if cmd.number.trim().is_empty() {
            return Err(DomainError::validation("order number cannot be empty"));
        }
        if cmd.items.is_empty() {
            return Err(DomainError::validation("cannot place an order without items"));
        }
        if let Some(item) = cmd.items.iter().find(|i| i.quantity == 0) {
            return Err(DomainError::validation(format!(
                "quantity of {} must be positive",
                item.product_id
            )));
        }
        if cmd.delivery_amount < Money::ZERO || cmd.total_amount < Money::ZERO {
            return Err(DomainError::validation("amounts cannot be negative"));
        }
        if cmd.delivery_type == DeliveryType::Pickup && !cmd.delivery_amount.is_zero() {
            return Err(DomainError::validation("pickup orders carry no delivery charge"));
        }

        Ok(vec![OrderEvent::OrderPlaced(OrderPlaced {
            order_id: cmd.order_id.clone(),
            number: cmd.number.trim().to_string(),
            customer: cmd.customer.clone(),
            items: cmd.items.clone(),
            delivery_type: cmd.delivery_type,
            delivery_address: cmd.delivery_address.clone(),
            delivery_amount: cmd.delivery_amount,
            total_amount: cmd.total_amount,
            comment: cmd.comment.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_change_status(&self, cmd: &ChangeStatus) -> Result<Vec<OrderEvent>, DomainError> {
        self.ensure_placed()?;

        if self.status == cmd.status {
            return Err(DomainError::conflict(format!("order is already {}", cmd.status)));
        }

        Ok(vec![OrderEvent::StatusChanged(StatusChanged {
            order_id: cmd.order_id.clone(),
            from: self.status,
            to: cmd.status,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_payment(&self, cmd: &RecordPayment) -> Result<Vec<OrderEvent>, DomainError> {
        self.ensure_placed()?;

        if self.payment_status == cmd.status {
            return Err(DomainError::conflict("payment status is unchanged"));
        }
        if cmd.status == PaymentStatus::Refunded && self.payment_status != PaymentStatus::Paid {
            return Err(DomainError::invariant("only paid orders can be refunded"));
        }

        Ok(vec![OrderEvent::PaymentRecorded(PaymentRecorded {
            order_id: cmd.order_id.clone(),
            from: self.payment_status,
            to: cmd.status,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_assign_tracking(&self, cmd: &AssignTracking) -> Result<Vec<OrderEvent>, DomainError> {
        self.ensure_placed()?;

        let tracking_number = cmd.tracking_number.trim();
        if tracking_number.is_empty() {
            return Err(DomainError::validation("tracking number cannot be empty"));
        }

        Ok(vec![OrderEvent::TrackingAssigned(TrackingAssigned {
            order_id: cmd.order_id.clone(),
            tracking_number: tracking_number.to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
