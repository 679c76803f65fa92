//! # Order Desk
//!
//! Back office for a restaurant that takes orders online: customers check out from a cart,
//! administrators validate, edit, advance, cancel and dispatch them, and couriers carry
//! delivery orders.
//!
//! Every collection (`orders`, `products`, `couriers`) is owned by one
//! [`ResourceActor`](actor_framework::ResourceActor) from the `actor-framework` crate. The
//! actor serializes all writes to its records and publishes each committed change on a
//! broadcast feed, which is what [`OrderClient::watch`](clients::OrderClient::watch) follows.
//!
//! ## Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each actor defines its own error type ([`OrderError`](order_actor::OrderError),
//! [`CourierError`](courier_actor::CourierError), [`ProductError`](product_actor::ProductError)).
//! The framework carries it boxed and the clients downcast it back, so callers match on
//! domain errors, never on strings.
//!
//! ### 2. The Gate Runs Inside the Actor
//! Checkout checks ([`gate`]) run in the order actor's `on_create` hook. A rejected order is
//! never stored and never published.
//!
//! ### 3. Derived Courier Status
//! Courier availability is recomputed from en-route orders by the [`dispatch`] layer after
//! every assignment change.
//!
//! ## Module Tour
//!
//! - [`model`]: records and request payloads (orders, couriers, products)
//! - [`order_actor`], [`product_actor`], [`courier_actor`]: the `ActorEntity` implementations
//! - [`clients`]: typed wrappers over `ResourceClient`
//! - [`gate`]: anti-abuse checks for checkouts
//! - [`dispatch`]: courier assignment across the order and courier actors
//! - [`reports`]: sales summaries over delivered orders
//! - [`config`]: [`Settings`](config::Settings) and their `ORDER_DESK_*` overrides
//! - [`lifecycle`]: [`OrderSystem`](lifecycle::OrderSystem), startup and shutdown
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod config;
pub mod courier_actor;
pub mod dispatch;
pub mod gate;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod product_actor;
pub mod reports;
