//! Orders and everything stored on them.
//!
//! The record mirrors the `orders/{id}` document: customer, lines, money, status with its
//! history, and the courier currently carrying it. Status rules live in
//! [`crate::order_actor`]; this module only holds data and the arithmetic on it.

use crate::config::Settings;
use crate::model::{CourierId, ProductId};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Human-readable order token, `SR-NNNN-L`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Four zero-padded digits and one uppercase letter. Collisions are handled by the actor.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let digits: u16 = rng.gen_range(0..10_000);
        let letter = char::from(b'A' + rng.gen_range(0..26u8));
        Self(format!("SR-{digits:04}-{letter}"))
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    EnRoute,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Position on the forward path. Cancellation sits outside it.
    pub fn rank(self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Preparing => Some(2),
            OrderStatus::EnRoute => Some(3),
            OrderStatus::Delivered => Some(4),
            OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::EnRoute => "en_route",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    #[default]
    Pickup,
    Delivery,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self
                .address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        }
    }
}

/// A line as submitted from a cart or an admin edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(name: impl Into<String>, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            product_id: None,
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    pub fn for_product(mut self, id: ProductId) -> Self {
        self.product_id = Some(id);
        self
    }
}

/// A stored line with its computed subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

/// Money arithmetic left the range of [`Decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Amount out of range")]
pub struct AmountOverflow;

/// `unit_price * quantity`, or `None` when it does not fit.
pub fn line_subtotal(unit_price: Decimal, quantity: u32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}

/// Lines are priced by [`Order::recompute_totals`]; the subtotal starts at zero.
impl From<CartItem> for LineItem {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name.trim().to_string(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            subtotal: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub note: String,
}

/// The courier linked to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourierRef {
    pub id: CourierId,
    pub name: String,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub validated: bool,
    /// Entered by an administrator rather than through checkout.
    pub manual: bool,
    /// Rate-limit identity of the checkout that produced the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    pub customer: Customer,
    pub delivery_type: DeliveryType,
    pub items: Vec<LineItem>,
    pub observations: Option<String>,
    pub payment_method: PaymentMethod,
    pub subtotal: Decimal,
    pub delivery_cost: Decimal,
    pub discount: Decimal,
    pub tip: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
    pub last_edited_at: Option<DateTime<Utc>>,
    pub estimated_ready_at: DateTime<Utc>,
    pub status_history: Vec<StatusEntry>,
    #[serde(rename = "deliveryPerson")]
    pub courier: Option<CourierRef>,
    pub tracking_url: String,
    pub validation_url: String,
}

/// Submission from the customer checkout.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    /// Identity the rate limiter counts orders against (session or device).
    pub client_key: String,
    pub customer: Customer,
    pub delivery_type: DeliveryType,
    pub items: Vec<CartItem>,
    pub observations: Option<String>,
    pub payment_method: PaymentMethod,
    pub tip: Decimal,
    pub discount: Decimal,
    /// Hidden form field. Humans leave it empty.
    pub honeypot: Option<String>,
}

/// Order typed in by an administrator, e.g. from a phone call.
#[derive(Debug, Clone, Default)]
pub struct ManualOrderRequest {
    pub customer: Customer,
    pub delivery_type: DeliveryType,
    pub items: Vec<CartItem>,
    pub observations: Option<String>,
    pub payment_method: PaymentMethod,
    pub tip: Decimal,
    pub discount: Decimal,
}

#[derive(Debug, Clone)]
pub enum OrderCreate {
    Checkout(CheckoutRequest),
    Manual(ManualOrderRequest),
}

/// Whole-record edits that do not touch lines or status.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub customer: Option<Customer>,
    pub payment_method: Option<PaymentMethod>,
    pub observations: Option<String>,
}

fn clean_observations(observations: Option<String>) -> Option<String> {
    observations
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    fn base(
        id: OrderId,
        customer: Customer,
        delivery_type: DeliveryType,
        items: Vec<CartItem>,
        observations: Option<String>,
        payment_method: PaymentMethod,
        tip: Decimal,
        discount: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        let mut order = Self {
            id,
            status: OrderStatus::Pending,
            validated: false,
            manual: false,
            client_key: None,
            customer: customer.trimmed(),
            delivery_type,
            items: items.into_iter().map(LineItem::from).collect(),
            observations: clean_observations(observations),
            payment_method,
            subtotal: Decimal::ZERO,
            delivery_cost: Decimal::ZERO,
            discount,
            tip,
            total: Decimal::ZERO,
            created_at: now,
            validated_at: None,
            last_edited_at: None,
            estimated_ready_at: now,
            status_history: Vec::new(),
            courier: None,
            tracking_url: String::new(),
            validation_url: String::new(),
        };
        order
    }

    /// A pending, unvalidated order from checkout.
    pub fn checkout(id: OrderId, req: CheckoutRequest, now: DateTime<Utc>) -> Self {
        let mut order = Self::base(
            id,
            req.customer,
            req.delivery_type,
            req.items,
            req.observations,
            req.payment_method,
            req.tip,
            req.discount,
            now,
        );
        order.client_key = Some(req.client_key);
        order.record(OrderStatus::Pending, "order created", now);
        order
    }

    /// A confirmed, validated order entered by an administrator.
    pub fn manual(id: OrderId, req: ManualOrderRequest, now: DateTime<Utc>) -> Self {
        let mut order = Self::base(
            id,
            req.customer,
            req.delivery_type,
            req.items,
            req.observations,
            req.payment_method,
            req.tip,
            req.discount,
            now,
        );
        order.status = OrderStatus::Confirmed;
        order.validated = true;
        order.validated_at = Some(now);
        order.manual = true;
        order.record(
            OrderStatus::Confirmed,
            "created manually by administrator",
            now,
        );
        order
    }

    /// Applies house settings that depend on where the order runs: delivery fee, ETA and
    /// the public links. Totals are priced last; on overflow they keep their old values.
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<Totals, AmountOverflow> {
        let minutes = match self.delivery_type {
            DeliveryType::Pickup => settings.pickup_minutes,
            DeliveryType::Delivery => settings.delivery_minutes,
        };
        self.delivery_cost = match self.delivery_type {
            DeliveryType::Pickup => Decimal::ZERO,
            DeliveryType::Delivery => settings.delivery_fee,
        };
        self.estimated_ready_at = self.created_at + Duration::minutes(i64::from(minutes));
        self.tracking_url = settings.tracking_url(&self.id);
        self.validation_url = settings.validation_url(&self.id);
        self.recompute_totals()
    }

    /// `total = subtotal + delivery_cost - discount + tip`, with every line re-priced.
    /// Nothing is written unless the whole computation fits in a [`Decimal`].
    pub fn recompute_totals(&mut self) -> Result<Totals, AmountOverflow> {
        let lines = self
            .items
            .iter()
            .map(|i| line_subtotal(i.unit_price, i.quantity))
            .collect::<Option<Vec<_>>>()
            .ok_or(AmountOverflow)?;
        let subtotal = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(*line))
            .ok_or(AmountOverflow)?;
        let total = subtotal
            .checked_add(self.delivery_cost)
            .and_then(|t| t.checked_sub(self.discount))
            .and_then(|t| t.checked_add(self.tip))
            .ok_or(AmountOverflow)?;

        for (item, line) in self.items.iter_mut().zip(lines) {
            item.subtotal = line;
        }
        self.subtotal = subtotal;
        self.total = total;
        Ok(self.totals())
    }

    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            total: self.total,
        }
    }

    pub fn record(&mut self, status: OrderStatus, note: impl Into<String>, at: DateTime<Utc>) {
        self.status_history.push(StatusEntry {
            status,
            timestamp: at,
            note: note.into(),
        });
    }

    pub fn units(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_delivery(&self) -> bool {
        self.delivery_type == DeliveryType::Delivery
    }

    pub fn courier_id(&self) -> Option<CourierId> {
        self.courier.as_ref().map(|c| c.id)
    }

    /// Whether this order counts toward the courier's workload.
    pub fn is_en_route_with(&self, courier: CourierId) -> bool {
        self.status == OrderStatus::EnRoute && self.courier_id() == Some(courier)
    }

    pub fn apply_update(&mut self, update: OrderUpdate) {
        if let Some(customer) = update.customer {
            self.customer = customer.trimmed();
        }
        if let Some(payment_method) = update.payment_method {
            self.payment_method = payment_method;
        }
        if update.observations.is_some() {
            self.observations = clean_observations(update.observations);
        }
    }
}

/// Admin board tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderView {
    #[default]
    All,
    /// Not validated yet.
    AwaitingValidation,
    /// Validated and confirmed or preparing.
    InKitchen,
    Dispatched,
    Cancelled,
}

/// Selection for [`OrderClient::list_orders`](crate::clients::OrderClient::list_orders).
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub view: OrderView,
    /// Case-insensitive match on id, customer name, phone or courier name.
    pub search: Option<String>,
    pub courier: Option<CourierId>,
}

impl OrderFilter {
    pub fn view(view: OrderView) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn courier(mut self, courier: CourierId) -> Self {
        self.courier = Some(courier);
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        let in_view = match self.view {
            OrderView::All => true,
            OrderView::AwaitingValidation => !order.validated,
            OrderView::InKitchen => {
                order.validated
                    && matches!(
                        order.status,
                        OrderStatus::Confirmed | OrderStatus::Preparing
                    )
            }
            OrderView::Dispatched => order.status == OrderStatus::EnRoute,
            OrderView::Cancelled => order.status == OrderStatus::Cancelled,
        };
        if !in_view {
            return false;
        }
        if let Some(courier) = self.courier {
            if order.courier_id() != Some(courier) {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => {
                let needle = text.to_lowercase();
                order.id.0.to_lowercase().contains(&needle)
                    || order.customer.name.to_lowercase().contains(&needle)
                    || order.customer.phone.contains(&needle)
                    || order
                        .courier
                        .as_ref()
                        .is_some_and(|c| c.name.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Newest first, the order the admin board shows.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
