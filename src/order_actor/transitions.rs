//! The order state machine.
//!
//! ```text
//! pending ─validate─▶ confirmed ─▶ preparing ─▶ en_route ─▶ delivered
//!    │                    │            │            │
//!    └────────────────────┴────────────┴────────────┴──▶ cancelled
//! ```
//!
//! Moves are forward only and may skip steps. Every status change and every edit appends
//! one history entry.

use super::OrderError;
use crate::model::{CartItem, CourierRef, LineItem, Order, OrderStatus, Totals};
use chrono::{DateTime, Duration, Utc};

impl Order {
    fn ensure_open(&self) -> Result<(), OrderError> {
        if self.status.is_terminal() {
            return Err(OrderError::Terminal(self.status));
        }
        Ok(())
    }

    pub fn validate(&mut self, now: DateTime<Utc>) -> Result<(), OrderError> {
        self.ensure_open()?;
        if self.validated {
            return Err(OrderError::AlreadyValidated);
        }
        if self.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: OrderStatus::Confirmed,
            });
        }
        self.validated = true;
        self.validated_at = Some(now);
        self.status = OrderStatus::Confirmed;
        self.record(OrderStatus::Confirmed, "validated by administrator", now);
        Ok(())
    }

    /// Moves the order to `to`. Returns the courier released by a delivery.
    pub fn advance(
        &mut self,
        to: OrderStatus,
        note: Option<String>,
        now: DateTime<Utc>,
        en_route_minutes: u32,
    ) -> Result<Option<CourierRef>, OrderError> {
        if to == OrderStatus::Cancelled {
            return self.cancel(note, now);
        }
        self.ensure_open()?;
        if !self.validated {
            return Err(OrderError::NotValidated);
        }
        let forward = matches!(
            (self.status.rank(), to.rank()),
            (Some(from), Some(target)) if target > from
        );
        if !forward {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to,
            });
        }

        let mut released = None;
        match to {
            OrderStatus::EnRoute => {
                if self.is_delivery() && self.courier.is_none() {
                    return Err(OrderError::CourierRequired);
                }
                self.estimated_ready_at = now + Duration::minutes(i64::from(en_route_minutes));
            }
            OrderStatus::Delivered => released = self.courier.take(),
            _ => {}
        }

        self.status = to;
        let note = note.unwrap_or_else(|| format!("status changed to {to}"));
        self.record(to, note, now);
        Ok(released)
    }

    /// Cancels from any open state and drops the courier link.
    pub fn cancel(
        &mut self,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<CourierRef>, OrderError> {
        self.ensure_open()?;
        self.status = OrderStatus::Cancelled;
        let note = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "cancelled".to_string());
        self.record(OrderStatus::Cancelled, note, now);
        Ok(self.courier.take())
    }

    /// Replaces the lines and recomputes totals with the stored fee, discount and tip.
    pub fn edit_items(
        &mut self,
        items: Vec<CartItem>,
        observations: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Totals, OrderError> {
        self.ensure_open()?;
        if items.is_empty() {
            return Err(OrderError::EmptyItems);
        }
        if let Some(item) = items.iter().find(|i| i.quantity == 0) {
            return Err(OrderError::InvalidQuantity(item.name.clone()));
        }

        let previous = std::mem::replace(
            &mut self.items,
            items.into_iter().map(LineItem::from).collect(),
        );
        let totals = match self.recompute_totals() {
            Ok(totals) => totals,
            Err(overflow) => {
                self.items = previous;
                return Err(overflow.into());
            }
        };
        if let Some(observations) = observations {
            let trimmed = observations.trim();
            self.observations = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        self.last_edited_at = Some(now);
        self.record(self.status, "edited by administrator", now);
        Ok(totals)
    }

    pub fn assign_courier(&mut self, courier: CourierRef) -> Result<(), OrderError> {
        self.ensure_open()?;
        if !self.is_delivery() {
            return Err(OrderError::NotDelivery);
        }
        self.courier = Some(courier);
        Ok(())
    }

    pub fn release_courier(&mut self) -> Option<CourierRef> {
        self.courier.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::model::{
        CheckoutRequest, CourierId, Customer, DeliveryType, ManualOrderRequest, OrderId,
    };
    use rust_decimal::Decimal;

    fn items() -> Vec<CartItem> {
        vec![
            CartItem::new("Sake Roll", Decimal::from(6500), 2),
            CartItem::new("Gyoza", Decimal::from(3900), 1),
        ]
    }

    fn pending(delivery_type: DeliveryType) -> Order {
        let now = Utc::now();
        let req = CheckoutRequest {
            client_key: "device-1".into(),
            customer: Customer::new("Maria Soto", "+56912345678")
                .with_address("Los Leones 450, depto 12"),
            delivery_type,
            items: items(),
            ..CheckoutRequest::default()
        };
        let mut order = Order::checkout(OrderId::from("SR-0001-A"), req, now);
        order.apply_settings(&Settings::default()).unwrap();
        order
    }

    fn courier() -> CourierRef {
        CourierRef {
            id: CourierId(1),
            name: "Pedro".into(),
            assigned_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_once() {
        let mut order = pending(DeliveryType::Pickup);
        let now = Utc::now();
        order.validate(now).unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert!(order.validated);
        assert_eq!(order.validated_at, Some(now));
        assert_eq!(
            order.status_history.last().map(|e| e.note.as_str()),
            Some("validated by administrator")
        );
        assert_eq!(order.validate(now), Err(OrderError::AlreadyValidated));
    }

    #[test]
    fn test_advance_requires_validation() {
        let mut order = pending(DeliveryType::Pickup);
        assert_eq!(
            order.advance(OrderStatus::Preparing, None, Utc::now(), 15),
            Err(OrderError::NotValidated)
        );
        assert_eq!(order.status_history.len(), 1);
    }

    #[test]
    fn test_forward_only() {
        let mut order = pending(DeliveryType::Pickup);
        let now = Utc::now();
        order.validate(now).unwrap();
        order.advance(OrderStatus::Preparing, None, now, 15).unwrap();
        assert_eq!(
            order.advance(OrderStatus::Confirmed, None, now, 15),
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Preparing,
                to: OrderStatus::Confirmed,
            })
        );
        assert!(order
            .advance(OrderStatus::Preparing, None, now, 15)
            .is_err());
        assert_eq!(
            order.status_history.last().map(|e| e.note.as_str()),
            Some("status changed to preparing")
        );
    }

    #[test]
    fn test_delivery_needs_courier_to_leave() {
        let mut order = pending(DeliveryType::Delivery);
        let now = Utc::now();
        order.validate(now).unwrap();
        assert_eq!(
            order.advance(OrderStatus::EnRoute, None, now, 15),
            Err(OrderError::CourierRequired)
        );

        order.assign_courier(courier()).unwrap();
        order.advance(OrderStatus::EnRoute, None, now, 15).unwrap();
        assert_eq!(order.estimated_ready_at, now + Duration::minutes(15));
        assert!(order.is_en_route_with(CourierId(1)));

        let released = order
            .advance(OrderStatus::Delivered, Some("left at door".into()), now, 15)
            .unwrap();
        assert_eq!(released.map(|c| c.id), Some(CourierId(1)));
        assert!(order.courier.is_none());
        assert_eq!(order.status_history.last().unwrap().note, "left at door");
    }

    #[test]
    fn test_pickup_goes_out_without_courier() {
        let mut order = pending(DeliveryType::Pickup);
        let now = Utc::now();
        order.validate(now).unwrap();
        assert!(order.advance(OrderStatus::EnRoute, None, now, 15).is_ok());
        assert_eq!(
            order.assign_courier(courier()),
            Err(OrderError::NotDelivery)
        );
    }

    #[test]
    fn test_cancel_from_any_open_state() {
        let mut order = pending(DeliveryType::Delivery);
        order.assign_courier(courier()).unwrap();
        let released = order.cancel(Some("customer called".into()), Utc::now()).unwrap();
        assert!(released.is_some());
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.status_history.last().unwrap().note, "customer called");

        assert_eq!(
            order.cancel(None, Utc::now()),
            Err(OrderError::Terminal(OrderStatus::Cancelled))
        );
        assert_eq!(
            order.advance(OrderStatus::Delivered, None, Utc::now(), 15),
            Err(OrderError::Terminal(OrderStatus::Cancelled))
        );
    }

    #[test]
    fn test_advance_to_cancelled_delegates() {
        let mut order = pending(DeliveryType::Pickup);
        order
            .advance(OrderStatus::Cancelled, None, Utc::now(), 15)
            .unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.status_history.last().unwrap().note, "cancelled");
    }

    #[test]
    fn test_edit_items_recomputes_and_keeps_status() {
        let mut order = pending(DeliveryType::Delivery);
        order.discount = Decimal::from(500);
        order.tip = Decimal::from(1000);
        let now = Utc::now();

        let totals = order
            .edit_items(
                vec![CartItem::new("Sake Roll", Decimal::from(6500), 3)],
                Some("  no wasabi ".into()),
                now,
            )
            .unwrap();

        assert_eq!(totals.subtotal, Decimal::from(19_500));
        assert_eq!(totals.total, Decimal::from(19_500 + 3000 - 500 + 1000));
        assert_eq!(order.observations.as_deref(), Some("no wasabi"));
        assert_eq!(order.last_edited_at, Some(now));
        let last = order.status_history.last().unwrap();
        assert_eq!(last.status, OrderStatus::Pending);
        assert_eq!(last.note, "edited by administrator");
    }

    #[test]
    fn test_edit_items_rejections() {
        let mut order = pending(DeliveryType::Pickup);
        assert_eq!(
            order.edit_items(vec![], None, Utc::now()),
            Err(OrderError::EmptyItems)
        );
        assert_eq!(
            order.edit_items(
                vec![CartItem::new("Gyoza", Decimal::from(3900), 0)],
                None,
                Utc::now()
            ),
            Err(OrderError::InvalidQuantity("Gyoza".into()))
        );

        let before = order.clone();
        assert_eq!(
            order.edit_items(
                vec![CartItem::new("Omakase", Decimal::MAX, 2)],
                Some("for the whole office".into()),
                Utc::now()
            ),
            Err(OrderError::AmountOutOfRange)
        );
        assert_eq!(order, before);

        order.cancel(None, Utc::now()).unwrap();
        assert_eq!(
            order.edit_items(items(), None, Utc::now()),
            Err(OrderError::Terminal(OrderStatus::Cancelled))
        );
    }

    #[test]
    fn test_manual_order_starts_validated() {
        let req = ManualOrderRequest {
            customer: Customer::new("Maria Soto", "+56912345678"),
            items: items(),
            ..ManualOrderRequest::default()
        };
        let mut order = Order::manual(OrderId::from("SR-0002-B"), req, Utc::now());
        assert_eq!(order.validate(Utc::now()), Err(OrderError::AlreadyValidated));
        assert!(order
            .advance(OrderStatus::Preparing, None, Utc::now(), 15)
            .is_ok());
    }
}
