//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent actor systems on Tokio. Each resource type
//! (orders, couriers, products, …) lives in its own actor that owns a keyed collection and
//! processes requests one at a time. The pattern is **Resource-Oriented Architecture** on top
//! of the **Actor Model**:
//!
//! - every collection answers the same requests: create, get, list, update, delete, plus
//!   domain-specific actions;
//! - state is isolated inside the actor task, so there are no locks around the store;
//! - collections coordinate through their clients, never through shared memory.
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - business rules and the record type
//! 2. **Runtime Layer** ([`ResourceActor`]) - message loop, id allocation, change feed
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed requests
//!
//! ## Change Feed
//!
//! Every committed create, update, delete or mutating action is published as a [`Change`]
//! on a broadcast channel. [`ResourceClient::subscribe`] returns a receiver, which is how
//! callers watch one record or a whole collection.
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected at **runtime** via `run(context)`, not at construction time.
//! An order actor can hold a catalog client in its context while the catalog actor knows
//! nothing about orders:
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor, ResourceClient};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Dish { id: u32 }
//! #[derive(Debug)] struct DishCreate;
//! #[derive(Debug)] struct DishUpdate;
//! #[derive(Debug)] enum DishAction {}
//! #[derive(Debug, thiserror::Error)] #[error("dish error")] struct DishError;
//!
//! #[async_trait]
//! impl ActorEntity for Dish {
//!     type Id = u32; type Create = DishCreate; type Update = DishUpdate; type Action = DishAction;
//!     type ActionResult = (); type Context = (); type Error = DishError;
//!     fn from_create_params(id: u32, _: DishCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     fn id(&self) -> &u32 { &self.id }
//!     async fn on_update(&mut self, _: DishUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: DishAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[derive(Clone, Debug)] struct Ticket { id: u32, dish: u32 }
//! #[derive(Debug)] struct TicketCreate { dish: u32 }
//! #[derive(Debug)] struct TicketUpdate;
//! #[derive(Debug)] enum TicketAction {}
//! #[derive(Debug, thiserror::Error)] #[error("unknown dish")] struct TicketError;
//!
//! #[async_trait]
//! impl ActorEntity for Ticket {
//!     type Id = u32; type Create = TicketCreate; type Update = TicketUpdate; type Action = TicketAction;
//!     type ActionResult = (); type Context = ResourceClient<Dish>; type Error = TicketError;
//!
//!     fn from_create_params(id: u32, p: TicketCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, dish: p.dish })
//!     }
//!     fn id(&self) -> &u32 { &self.id }
//!     async fn on_create(&mut self, dishes: &ResourceClient<Dish>) -> Result<(), Self::Error> {
//!         match dishes.get(self.dish).await {
//!             Ok(Some(_)) => Ok(()),
//!             _ => Err(TicketError),
//!         }
//!     }
//!     async fn on_update(&mut self, _: TicketUpdate, _: &ResourceClient<Dish>) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: TicketAction, _: &ResourceClient<Dish>) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (dish_actor, dishes) = ResourceActor::<Dish>::new(10);
//!     let (ticket_actor, tickets) = ResourceActor::<Ticket>::new(10);
//!
//!     tokio::spawn(dish_actor.run(()));
//!     tokio::spawn(ticket_actor.run(dishes.clone()));
//!
//!     let dish = dishes.create(DishCreate).await.unwrap();
//!     assert!(tickets.create(TicketCreate { dish }).await.is_ok());
//!     assert!(tickets.create(TicketCreate { dish: 99 }).await.is_err());
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Messages are processed **sequentially** within an actor
//! - Multiple actors run in **parallel**
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a client's requests from a queue of expectations, so actors
//! and orchestrators can be tested without their dependencies running.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Change, ResourceRequest, Response};
