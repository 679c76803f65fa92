//! Custom actions for the Order actor.
//!
//! Each action is applied to a copy of the stored order; the copy replaces the record only
//! when the action succeeds, so a rejected transition leaves the order untouched.

use crate::model::{CartItem, CourierRef, Order, OrderStatus, Totals};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Admin approval of a pending checkout.
    Validate,
    /// Forward move along the status path. `note` replaces the default history note.
    Advance {
        to: OrderStatus,
        note: Option<String>,
    },
    Cancel { reason: Option<String> },
    /// Replaces every line and optionally the observations.
    EditItems {
        items: Vec<CartItem>,
        observations: Option<String>,
    },
    AssignCourier(CourierRef),
    ReleaseCourier,
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    Validated(Order),
    /// The order after an advance or cancel, with the courier it let go of, if any.
    Transitioned {
        order: Order,
        released: Option<CourierRef>,
    },
    Edited(Totals),
    CourierAssigned(Order),
    CourierReleased(Option<CourierRef>),
}
