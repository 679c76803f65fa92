//! # Anti-Abuse Gate
//!
//! Every checkout passes through [`Gate::screen_checkout`] inside the order actor's
//! `on_create` hook, so a rejected order is never stored.
//!
//! Checks, first failure wins:
//!
//! 1. honeypot ([`check_honeypot`], run while the order is built)
//! 2. contact fields
//! 3. observations length
//! 4. quantities and cart value
//! 5. suspicious names
//! 6. per-client rate limit
//! 7. catalog prices (skipped when the catalog cannot be reached)
//!
//! Admin-entered orders only go through [`Gate::screen_manual`].

pub mod contact;
pub mod error;
pub mod pattern;
pub mod prices;
pub mod quantity;
pub mod rate_limit;

pub use contact::{check_honeypot, is_valid_phone};
pub use error::GateError;
pub use rate_limit::RateLimiter;

use crate::clients::ProductClient;
use crate::config::GateLimits;
use crate::model::Order;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

pub struct Gate {
    limits: GateLimits,
    limiter: RateLimiter,
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(GateLimits::default())
    }
}

impl Gate {
    pub fn new(limits: GateLimits) -> Self {
        let limiter = RateLimiter::new(limits.rate.clone());
        Self { limits, limiter }
    }

    pub fn limits(&self) -> &GateLimits {
        &self.limits
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Runs the checkout checks against a freshly built order. `now` is the submission time
    /// recorded by the rate limiter.
    pub async fn screen_checkout(
        &self,
        order: &Order,
        catalog: &ProductClient,
        now: DateTime<Utc>,
    ) -> Result<(), GateError> {
        let result = self.screen_checkout_inner(order, catalog, now).await;
        match &result {
            Ok(()) => debug!(order_id = %order.id, "Checkout passed gate"),
            Err(e) => warn!(order_id = %order.id, reason = %e, "Checkout rejected"),
        }
        result
    }

    async fn screen_checkout_inner(
        &self,
        order: &Order,
        catalog: &ProductClient,
        now: DateTime<Utc>,
    ) -> Result<(), GateError> {
        let limits = &self.limits;
        contact::check_checkout(&order.customer, order.delivery_type, &order.items, limits)?;
        contact::check_observations(order.observations.as_deref(), limits)?;
        quantity::check_quantities(&order.items, limits)?;
        pattern::check_name(&order.customer.name, limits)?;

        // Orders without a client key share one bucket keyed by phone.
        let key = order
            .client_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or(order.customer.phone.as_str());
        self.limiter.check_at(key, now)?;

        prices::verify_against_catalog(&order.items, catalog, limits).await
    }

    pub fn screen_manual(&self, order: &Order) -> Result<(), GateError> {
        contact::check_manual(
            &order.customer,
            order.delivery_type,
            &order.items,
            &self.limits,
        )?;
        contact::check_observations(order.observations.as_deref(), &self.limits)
    }
}
