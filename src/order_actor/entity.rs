//! [`ActorEntity`] implementation for [`Order`].
//!
//! Creation builds the order synchronously (honeypot first), then `on_create` runs the gate
//! with the catalog and applies settings. Actions delegate to the state machine in
//! [`super::transitions`].

use super::{OrderAction, OrderActionResult, OrderContext, OrderError};
use crate::gate::{self, contact};
use crate::model::{Order, OrderCreate, OrderId, OrderUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        let now = Utc::now();
        match params {
            OrderCreate::Checkout(req) => {
                gate::check_honeypot(req.honeypot.as_deref())?;
                Ok(Order::checkout(id, req, now))
            }
            OrderCreate::Manual(req) => Ok(Order::manual(id, req, now)),
        }
    }

    fn id(&self) -> &OrderId {
        &self.id
    }

    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        if self.manual {
            ctx.gate.screen_manual(self)?;
        } else {
            ctx.gate
                .screen_checkout(self, &ctx.catalog, self.created_at)
                .await?;
        }
        self.apply_settings(&ctx.settings)?;
        debug!(order_id = %self.id, total = %self.total, "Order priced");
        Ok(())
    }

    async fn on_update(&mut self, update: OrderUpdate, ctx: &OrderContext) -> Result<(), OrderError> {
        if let Some(customer) = &update.customer {
            if !gate::is_valid_phone(&customer.phone) {
                return Err(gate::GateError::InvalidPhone(customer.phone.clone()).into());
            }
        }
        contact::check_observations(update.observations.as_deref(), ctx.gate.limits())?;
        self.apply_update(update);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<OrderActionResult, OrderError> {
        let now = Utc::now();
        match action {
            OrderAction::Validate => {
                self.validate(now)?;
                Ok(OrderActionResult::Validated(self.clone()))
            }
            OrderAction::Advance { to, note } => {
                let released = self.advance(to, note, now, ctx.settings.en_route_minutes)?;
                Ok(OrderActionResult::Transitioned {
                    order: self.clone(),
                    released,
                })
            }
            OrderAction::Cancel { reason } => {
                let released = self.cancel(reason, now)?;
                Ok(OrderActionResult::Transitioned {
                    order: self.clone(),
                    released,
                })
            }
            OrderAction::EditItems {
                items,
                observations,
            } => {
                contact::check_observations(observations.as_deref(), ctx.gate.limits())?;
                let totals = self.edit_items(items, observations, now)?;
                Ok(OrderActionResult::Edited(totals))
            }
            OrderAction::AssignCourier(courier) => {
                self.assign_courier(courier)?;
                Ok(OrderActionResult::CourierAssigned(self.clone()))
            }
            OrderAction::ReleaseCourier => {
                Ok(OrderActionResult::CourierReleased(self.release_courier()))
            }
        }
    }
}
