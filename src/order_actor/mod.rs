//! # Order Actor
//!
//! Owns the `orders` collection and enforces the lifecycle rules.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`transitions`] - status machine and line edits, as methods on [`Order`]
//! - [`actions`] - [`OrderAction`] and [`OrderActionResult`]
//! - [`error`] - [`OrderError`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Context
//!
//! The actor runs with an [`OrderContext`]: the catalog client used by the price check,
//! the shared [`Gate`] and the [`Settings`]. Ids are random `SR-NNNN-L` tokens; the actor
//! retries on collision.
//!
//! ```rust,ignore
//! let (actor, client) = order_actor::new(32);
//! tokio::spawn(actor.run(OrderContext::new(product_client, gate, settings)));
//! let id = client.create_checkout(request).await?;
//! client.validate(id.clone()).await?;
//! ```

pub mod actions;
pub mod entity;
pub mod error;
pub mod transitions;

pub use actions::*;
pub use error::*;

use crate::clients::{OrderClient, ProductClient};
use crate::config::Settings;
use crate::gate::Gate;
use crate::model::{Order, OrderId};
use actor_framework::ResourceActor;
use std::sync::Arc;

/// Dependencies injected into the Order actor at `run` time.
#[derive(Clone)]
pub struct OrderContext {
    pub catalog: ProductClient,
    pub gate: Arc<Gate>,
    pub settings: Arc<Settings>,
}

impl OrderContext {
    pub fn new(catalog: ProductClient, gate: Arc<Gate>, settings: Arc<Settings>) -> Self {
        Self {
            catalog,
            gate,
            settings,
        }
    }
}

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::with_id_generator(buffer_size, || {
        OrderId::random(&mut rand::thread_rng())
    });
    (actor, OrderClient::new(generic_client))
}
