//! Error types for the Courier actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CourierError {
    #[error("Courier not found: {0}")]
    NotFound(String),

    #[error("Courier name is required")]
    EmptyName,

    #[error("Phone must be +569 followed by 8 digits: {0}")]
    InvalidPhone(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CourierError {
    fn from(msg: String) -> Self {
        CourierError::ActorCommunicationError(msg)
    }
}
