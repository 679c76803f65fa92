//! Sales aggregation.
//!
//! Only delivered orders count. Money is summed exactly; the average ticket is rounded to
//! whole pesos.

use crate::model::{DeliveryType, Order, OrderStatus, PaymentMethod};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Products kept in [`SalesSummary::top_products`].
pub const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    /// The last 7 days.
    Week,
    /// The last 30 days.
    Month,
    /// The last 365 days.
    Year,
}

impl Period {
    /// `[from, to)` ending at `now`.
    pub fn range(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = match self {
            Period::Today => Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN)),
            Period::Week => now - Duration::days(7),
            Period::Month => now - Duration::days(30),
            Period::Year => now - Duration::days(365),
        };
        (from, now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub name: String,
    pub units: u32,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub orders: usize,
    pub revenue: Decimal,
    pub average_ticket: Decimal,
    /// Best sellers by units, ties broken by name.
    pub top_products: Vec<ProductSales>,
    pub by_payment_method: BTreeMap<PaymentMethod, usize>,
    pub by_delivery_type: BTreeMap<DeliveryType, usize>,
}

impl SalesSummary {
    /// Summarizes delivered orders created in `[from, to)`.
    pub fn from_orders(orders: &[Order], from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        let delivered: Vec<&Order> = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Delivered)
            .filter(|o| o.created_at >= from && o.created_at < to)
            .collect();

        let revenue = delivered
            .iter()
            .fold(Decimal::ZERO, |acc, o| acc.saturating_add(o.total));
        let average_ticket = if delivered.is_empty() {
            Decimal::ZERO
        } else {
            (revenue / Decimal::from(delivered.len())).round_dp(0)
        };

        let mut products: HashMap<&str, ProductSales> = HashMap::new();
        let mut by_payment_method = BTreeMap::new();
        let mut by_delivery_type = BTreeMap::new();
        for order in &delivered {
            *by_payment_method.entry(order.payment_method).or_insert(0) += 1;
            *by_delivery_type.entry(order.delivery_type).or_insert(0) += 1;
            for item in &order.items {
                let entry = products
                    .entry(item.name.as_str())
                    .or_insert_with(|| ProductSales {
                        name: item.name.clone(),
                        units: 0,
                        revenue: Decimal::ZERO,
                    });
                entry.units = entry.units.saturating_add(item.quantity);
                entry.revenue = entry.revenue.saturating_add(item.subtotal);
            }
        }

        let mut top_products: Vec<ProductSales> = products.into_values().collect();
        top_products.sort_by(|a, b| b.units.cmp(&a.units).then_with(|| a.name.cmp(&b.name)));
        top_products.truncate(TOP_PRODUCTS);

        Self {
            from,
            to,
            orders: delivered.len(),
            revenue,
            average_ticket,
            top_products,
            by_payment_method,
            by_delivery_type,
        }
    }

    pub fn for_period(orders: &[Order], period: Period, now: DateTime<Utc>) -> Self {
        let (from, to) = period.range(now);
        Self::from_orders(orders, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::model::{CartItem, Customer, ManualOrderRequest, OrderId};

    fn order(
        id: &str,
        items: Vec<CartItem>,
        payment_method: PaymentMethod,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Order {
        let req = ManualOrderRequest {
            customer: Customer::new("Maria Soto", "+56912345678"),
            items,
            payment_method,
            ..ManualOrderRequest::default()
        };
        let mut order = Order::manual(OrderId::from(id), req, created_at);
        order.apply_settings(&Settings::default()).unwrap();
        order.status = status;
        order
    }

    fn roll(qty: u32) -> CartItem {
        CartItem::new("Sake Roll", Decimal::from(6500), qty)
    }

    fn gyoza(qty: u32) -> CartItem {
        CartItem::new("Gyoza", Decimal::from(3900), qty)
    }

    #[test]
    fn test_only_delivered_in_range_count() {
        let now = Utc::now();
        let orders = vec![
            order("SR-0001-A", vec![roll(2)], PaymentMethod::Cash, OrderStatus::Delivered, now - Duration::hours(1)),
            order("SR-0002-B", vec![gyoza(1)], PaymentMethod::Card, OrderStatus::Delivered, now - Duration::hours(2)),
            order("SR-0003-C", vec![roll(5)], PaymentMethod::Card, OrderStatus::Cancelled, now - Duration::hours(1)),
            order("SR-0004-D", vec![roll(1)], PaymentMethod::Cash, OrderStatus::Delivered, now - Duration::days(3)),
        ];

        let summary = SalesSummary::from_orders(&orders, now - Duration::days(1), now);
        assert_eq!(summary.orders, 2);
        assert_eq!(summary.revenue, Decimal::from(13_000 + 3_900));
        assert_eq!(summary.average_ticket, Decimal::from(8_450));
        assert_eq!(summary.by_payment_method.get(&PaymentMethod::Cash), Some(&1));
        assert_eq!(summary.by_payment_method.get(&PaymentMethod::Card), Some(&1));
        assert_eq!(summary.by_delivery_type.get(&DeliveryType::Pickup), Some(&2));

        let week = SalesSummary::for_period(&orders, Period::Week, now);
        assert_eq!(week.orders, 3);
    }

    #[test]
    fn test_top_products_by_units() {
        let now = Utc::now();
        let orders = vec![
            order("SR-0001-A", vec![roll(1), gyoza(3)], PaymentMethod::Cash, OrderStatus::Delivered, now - Duration::minutes(5)),
            order("SR-0002-B", vec![roll(1)], PaymentMethod::Transfer, OrderStatus::Delivered, now - Duration::minutes(4)),
        ];
        let summary = SalesSummary::from_orders(&orders, now - Duration::hours(1), now);
        assert_eq!(
            summary.top_products,
            vec![
                ProductSales {
                    name: "Gyoza".into(),
                    units: 3,
                    revenue: Decimal::from(11_700),
                },
                ProductSales {
                    name: "Sake Roll".into(),
                    units: 2,
                    revenue: Decimal::from(13_000),
                },
            ]
        );
    }

    #[test]
    fn test_revenue_saturates() {
        let now = Utc::now();
        let mut orders = vec![
            order("SR-0001-A", vec![roll(1)], PaymentMethod::Cash, OrderStatus::Delivered, now - Duration::minutes(5)),
            order("SR-0002-B", vec![roll(1)], PaymentMethod::Cash, OrderStatus::Delivered, now - Duration::minutes(4)),
        ];
        for order in &mut orders {
            order.total = Decimal::MAX;
            order.items[0].subtotal = Decimal::MAX;
        }
        let summary = SalesSummary::from_orders(&orders, now - Duration::hours(1), now);
        assert_eq!(summary.revenue, Decimal::MAX);
        assert_eq!(summary.top_products[0].revenue, Decimal::MAX);
    }

    #[test]
    fn test_empty_period() {
        let now = Utc::now();
        let summary = SalesSummary::from_orders(&[], now - Duration::days(1), now);
        assert_eq!(summary.orders, 0);
        assert_eq!(summary.average_ticket, Decimal::ZERO);
        assert!(summary.top_products.is_empty());
    }

    #[test]
    fn test_today_starts_at_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap();
        let (from, to) = Period::Today.range(now);
        assert_eq!(from, Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap());
        assert_eq!(to, now);
    }
}
