//! Upper bounds on cart size and value.

use super::GateError;
use crate::config::GateLimits;
use crate::model::{line_subtotal, LineItem};
use rust_decimal::Decimal;

pub fn check_quantities(items: &[LineItem], limits: &GateLimits) -> Result<(), GateError> {
    let mut units: u32 = 0;
    let mut value = Decimal::ZERO;
    for item in items {
        if item.quantity == 0 || item.quantity > limits.max_item_quantity {
            return Err(GateError::ItemQuantity {
                item: item.name.clone(),
                max: limits.max_item_quantity,
            });
        }
        units = units.saturating_add(item.quantity);
        // A cart too large to add up is over any limit.
        value = line_subtotal(item.unit_price, item.quantity)
            .and_then(|line| value.checked_add(line))
            .ok_or(GateError::OrderValueTooHigh {
                value: Decimal::MAX,
                max: limits.max_order_value,
            })?;
    }
    if units > limits.max_total_units {
        return Err(GateError::TooManyUnits {
            units,
            max: limits.max_total_units,
        });
    }
    if value > limits.max_order_value {
        return Err(GateError::OrderValueTooHigh {
            value,
            max: limits.max_order_value,
        });
    }
    Ok(())
}
