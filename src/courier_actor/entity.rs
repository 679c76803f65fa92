//! [`ActorEntity`] implementation for [`Courier`].
//!
//! Status is never taken at face value: apart from going offline, every write ends by
//! re-deriving it from `active_orders`.

use super::{CourierAction, CourierActionResult, CourierError};
use crate::gate::is_valid_phone;
use crate::model::{Courier, CourierCreate, CourierId, CourierStatus, CourierUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

fn clean_name(name: &str) -> Result<String, CourierError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CourierError::EmptyName);
    }
    Ok(name.to_string())
}

fn clean_phone(phone: &str) -> Result<String, CourierError> {
    if !is_valid_phone(phone) {
        return Err(CourierError::InvalidPhone(phone.to_string()));
    }
    Ok(phone.trim().to_string())
}

#[async_trait]
impl ActorEntity for Courier {
    type Id = CourierId;
    type Create = CourierCreate;
    type Update = CourierUpdate;
    type Action = CourierAction;
    type ActionResult = CourierActionResult;
    type Context = ();
    type Error = CourierError;

    fn from_create_params(id: CourierId, params: CourierCreate) -> Result<Self, CourierError> {
        clean_name(&params.name)?;
        clean_phone(&params.phone)?;
        Ok(Courier::new(id, params, Utc::now()))
    }

    fn id(&self) -> &CourierId {
        &self.id
    }

    async fn on_update(&mut self, update: CourierUpdate, _ctx: &()) -> Result<(), CourierError> {
        if let Some(name) = update.name {
            self.name = clean_name(&name)?;
        }
        if let Some(phone) = update.phone {
            self.phone = clean_phone(&phone)?;
        }
        match update.status {
            Some(CourierStatus::Offline) => self.status = CourierStatus::Offline,
            // Coming back online: the workload decides between available and busy.
            Some(_) => {
                self.status = CourierStatus::Available;
                self.status = self.derived_status();
            }
            None => {}
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CourierAction,
        _ctx: &(),
    ) -> Result<CourierActionResult, CourierError> {
        match action {
            CourierAction::SetActive(active) => {
                self.active = active;
                Ok(CourierActionResult::SetActive(self.clone()))
            }
            CourierAction::SyncWorkload(count) => {
                self.active_orders = count;
                self.status = self.derived_status();
                Ok(CourierActionResult::SyncWorkload(self.clone()))
            }
        }
    }
}
