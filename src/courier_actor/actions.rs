//! Custom actions for the Courier actor.

use crate::model::Courier;

#[derive(Debug, Clone)]
pub enum CourierAction {
    /// Inactive couriers stay on record but are never offered for dispatch.
    SetActive(bool),
    /// Stores the number of en-route orders and re-derives the status from it.
    SyncWorkload(u32),
}

/// Results from CourierActions - variants match 1:1 with CourierAction
#[derive(Debug, Clone)]
pub enum CourierActionResult {
    SetActive(Courier),
    SyncWorkload(Courier),
}
