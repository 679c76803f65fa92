//! Errors raised while coordinating orders and couriers.

use crate::courier_actor::CourierError;
use crate::model::{CourierId, OrderId, OrderStatus};
use crate::order_actor::OrderError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Courier(#[from] CourierError),

    #[error("Order {0} is not a delivery order")]
    NotDelivery(OrderId),

    #[error("Order {0} has not been validated")]
    NotValidated(OrderId),

    /// Only confirmed or preparing orders can be sent out.
    #[error("Order {id} is {status} and cannot be dispatched")]
    NotDispatchable { id: OrderId, status: OrderStatus },

    #[error("Courier {0} is not available")]
    CourierUnavailable(CourierId),
}
