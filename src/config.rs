//! Runtime settings.
//!
//! Every value has a default; `Settings::from_env` overrides them from `ORDER_DESK_*`
//! environment variables. Unparseable values fall back to the default.
//! [`Settings::from_lookup`] reads the same keys from any source.

use rust_decimal::Decimal;
use serde::Serialize;
use std::env;
use std::str::FromStr;

const PREFIX: &str = "ORDER_DESK_";

/// Prefixed variable lookup with typed fallbacks.
struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(&format!("{PREFIX}{name}"))
    }

    fn string(&self, name: &str, default: &str) -> String {
        self.get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    fn parsed<T: FromStr>(&self, name: &str, default: T) -> T {
        self.get(name)
            .and_then(|v| v.trim().parse::<T>().ok())
            .unwrap_or(default)
    }
}

/// Per-client order throttling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateLimits {
    /// Length of the sliding window checked against `max_per_window`.
    pub window_secs: u64,
    pub max_per_window: usize,
    pub min_interval_secs: u64,
    /// Orders allowed in any 24 hours.
    pub daily_limit: usize,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            window_secs: 10 * 60,
            max_per_window: 3,
            min_interval_secs: 30,
            daily_limit: 10,
        }
    }
}

/// Thresholds applied to incoming orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateLimits {
    pub min_name_chars: usize,
    pub min_address_chars: usize,
    pub max_observation_chars: usize,
    pub max_item_quantity: u32,
    pub max_total_units: u32,
    pub max_order_value: Decimal,
    /// Allowed difference between a cart unit price and the catalog price.
    pub unit_price_tolerance: Decimal,
    /// Allowed difference between the cart subtotal and the catalog-priced subtotal.
    pub subtotal_tolerance: Decimal,
    pub rate: RateLimits,
}

impl Default for GateLimits {
    fn default() -> Self {
        Self {
            min_name_chars: 3,
            min_address_chars: 10,
            max_observation_chars: 500,
            max_item_quantity: 20,
            max_total_units: 50,
            max_order_value: Decimal::from(500_000),
            unit_price_tolerance: Decimal::ONE,
            subtotal_tolerance: Decimal::from(100),
            rate: RateLimits::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Base of the links stored on each order (`{base}#track?id=…`).
    pub public_base_url: String,
    /// Request channel capacity of every actor.
    pub channel_capacity: usize,
    pub delivery_fee: Decimal,
    pub pickup_minutes: u32,
    pub delivery_minutes: u32,
    /// ETA reset applied when an order leaves with a courier.
    pub en_route_minutes: u32,
    pub gate: GateLimits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:8080/".to_string(),
            channel_capacity: 32,
            delivery_fee: Decimal::from(3000),
            pickup_minutes: 20,
            delivery_minutes: 40,
            en_route_minutes: 15,
            gate: GateLimits::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from `lookup`, which receives full `ORDER_DESK_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let vars = Vars(lookup);
        let d = Settings::default();
        let rate = RateLimits {
            window_secs: vars.parsed("RATE_WINDOW_SECS", d.gate.rate.window_secs),
            max_per_window: vars.parsed("RATE_MAX_PER_WINDOW", d.gate.rate.max_per_window),
            min_interval_secs: vars.parsed("RATE_MIN_INTERVAL_SECS", d.gate.rate.min_interval_secs),
            daily_limit: vars.parsed("RATE_DAILY_LIMIT", d.gate.rate.daily_limit),
        };
        let gate = GateLimits {
            min_name_chars: vars.parsed("MIN_NAME_CHARS", d.gate.min_name_chars),
            min_address_chars: vars.parsed("MIN_ADDRESS_CHARS", d.gate.min_address_chars),
            max_observation_chars: vars.parsed("MAX_OBSERVATION_CHARS", d.gate.max_observation_chars),
            max_item_quantity: vars.parsed("MAX_ITEM_QUANTITY", d.gate.max_item_quantity),
            max_total_units: vars.parsed("MAX_TOTAL_UNITS", d.gate.max_total_units),
            max_order_value: vars.parsed("MAX_ORDER_VALUE", d.gate.max_order_value),
            unit_price_tolerance: vars.parsed("UNIT_PRICE_TOLERANCE", d.gate.unit_price_tolerance),
            subtotal_tolerance: vars.parsed("SUBTOTAL_TOLERANCE", d.gate.subtotal_tolerance),
            rate,
        };
        Self {
            public_base_url: vars.string("PUBLIC_BASE_URL", &d.public_base_url),
            channel_capacity: vars.parsed("CHANNEL_CAPACITY", d.channel_capacity).max(1),
            delivery_fee: vars.parsed("DELIVERY_FEE", d.delivery_fee),
            pickup_minutes: vars.parsed("PICKUP_MINUTES", d.pickup_minutes),
            delivery_minutes: vars.parsed("DELIVERY_MINUTES", d.delivery_minutes),
            en_route_minutes: vars.parsed("EN_ROUTE_MINUTES", d.en_route_minutes),
            gate,
        }
    }

    pub fn tracking_url(&self, id: &impl std::fmt::Display) -> String {
        format!("{}#track?id={id}", self.public_base_url)
    }

    pub fn validation_url(&self, id: &impl std::fmt::Display) -> String {
        format!("{}#admin-validate?id={id}", self.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_house_rules() {
        let s = Settings::default();
        assert_eq!(s.delivery_fee, Decimal::from(3000));
        assert_eq!(s.gate.max_item_quantity, 20);
        assert_eq!(s.gate.max_total_units, 50);
        assert_eq!(s.gate.rate.max_per_window, 3);
        assert_eq!(s.gate.rate.daily_limit, 10);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ORDER_DESK_DELIVERY_FEE", "2500"),
            ("ORDER_DESK_RATE_DAILY_LIMIT", "not-a-number"),
            ("ORDER_DESK_PUBLIC_BASE_URL", " https://rolls.example/ "),
            ("ORDER_DESK_CHANNEL_CAPACITY", "0"),
            ("DELIVERY_FEE", "1"),
        ]);

        let s = Settings::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(s.delivery_fee, Decimal::from(2500));
        assert_eq!(s.gate.rate.daily_limit, 10);
        assert_eq!(s.channel_capacity, 1);
        assert_eq!(
            s.tracking_url(&"SR-0001-A"),
            "https://rolls.example/#track?id=SR-0001-A"
        );
    }

    #[test]
    fn test_empty_lookup_gives_defaults() {
        assert_eq!(Settings::from_lookup(|_| None), Settings::default());
    }

    #[test]
    fn test_settings_serialize_money_as_strings() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["delivery_fee"], "3000");
        assert_eq!(json["gate"]["rate"]["window_secs"], 600);
    }
}
