//! # System Lifecycle
//!
//! [`OrderSystem`] starts the three collection actors, wires them together and owns their
//! shutdown.
//!
//! ## Dependency Injection via Context
//!
//! Actors are created without dependencies and receive them through `run(context)`:
//!
//! ```rust,ignore
//! impl ActorEntity for Product { type Context = (); }
//! impl ActorEntity for Courier { type Context = (); }
//! impl ActorEntity for Order   { type Context = OrderContext; } // catalog, gate, settings
//! ```
//!
//! The order actor holds a catalog client, so the dependency graph is
//! `orders → products`. It is acyclic, and dropping every client shuts the actors down:
//! the order actor first, which then releases its catalog client.
//!
//! ## Graceful Shutdown
//!
//! 1. Drop all clients (including the ones inside the [`Dispatcher`](crate::dispatch::Dispatcher))
//! 2. Each actor sees its channel close and leaves its loop
//! 3. Await every task

pub mod order_system;

pub use order_system::*;
