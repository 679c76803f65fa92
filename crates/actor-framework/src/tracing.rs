//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a `tracing_subscriber` formatter for the whole process.
//!
//! - Levels come from `RUST_LOG` (`RUST_LOG=info`, `RUST_LOG=debug`, module filters such as
//!   `RUST_LOG=order_desk::gate=debug`).
//! - The compact format hides module paths; actors tag every event with `entity_type`
//!   instead.
//!
//! With `RUST_LOG=info` a checkout reads:
//!
//! ```text
//! INFO Actor started entity_type="Order"
//! INFO Created entity_type="Order" id=SR-0427-K size=1
//! INFO Action ok entity_type="Order" id=SR-0427-K
//! ```
//!
//! `RUST_LOG=debug` adds the request payloads (`Create params=…`, `Action action=Validate`).

/// Initializes the global subscriber. Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type already says where an event came from
        .compact()
        .init();
}
