//! Error types for the Order actor.

use crate::gate::GateError;
use crate::model::{AmountOverflow, OrderStatus};
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The anti-abuse gate turned the submission away.
    #[error("Order rejected: {0}")]
    Rejected(#[from] GateError),

    #[error("Order is already validated")]
    AlreadyValidated,

    #[error("Order must be validated before it can move forward")]
    NotValidated,

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Delivered and cancelled orders are read-only.
    #[error("Order is {0} and can no longer change")]
    Terminal(OrderStatus),

    #[error("A courier must be assigned before a delivery order goes out")]
    CourierRequired,

    #[error("Only delivery orders take a courier")]
    NotDelivery,

    #[error("An order needs at least one item")]
    EmptyItems,

    #[error("Quantity of {0} must be at least 1")]
    InvalidQuantity(String),

    /// Prices, tip or discount add up beyond what an amount can hold.
    #[error("Order amounts out of range")]
    AmountOutOfRange,

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<AmountOverflow> for OrderError {
    fn from(_: AmountOverflow) -> Self {
        OrderError::AmountOutOfRange
    }
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
