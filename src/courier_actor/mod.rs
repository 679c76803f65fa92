//! # Courier Actor
//!
//! Owns the courier roster. Couriers never learn about orders directly: the
//! [`Dispatcher`](crate::dispatch::Dispatcher) counts en-route orders and pushes the number
//! in with [`CourierAction::SyncWorkload`].
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Courier`]
//! - [`actions`] - [`CourierAction`] and [`CourierActionResult`]
//! - [`error`] - [`CourierError`]

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::CourierClient;
use crate::model::Courier;
use actor_framework::ResourceActor;

/// Creates a new Courier actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Courier>, CourierClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, CourierClient::new(generic_client))
}
