//! Form-level checks on who is ordering and where it goes.

use super::GateError;
use crate::config::GateLimits;
use crate::model::{Customer, DeliveryType, LineItem};

/// Chilean mobile numbers: `+569` and eight digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone
        .trim()
        .strip_prefix("+569")
        .is_some_and(|rest| rest.len() == 8 && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// A non-empty honeypot means a bot filled every field it saw.
pub fn check_honeypot(honeypot: Option<&str>) -> Result<(), GateError> {
    match honeypot.map(str::trim) {
        Some(value) if !value.is_empty() => Err(GateError::Honeypot),
        _ => Ok(()),
    }
}

fn check_address(
    customer: &Customer,
    delivery_type: DeliveryType,
    limits: &GateLimits,
) -> Result<(), GateError> {
    if delivery_type != DeliveryType::Delivery {
        return Ok(());
    }
    let len = customer
        .address
        .as_deref()
        .map(|a| a.trim().chars().count())
        .unwrap_or(0);
    if len < limits.min_address_chars {
        return Err(GateError::AddressTooShort {
            min: limits.min_address_chars,
        });
    }
    Ok(())
}

/// Required fields on a customer checkout.
pub fn check_checkout(
    customer: &Customer,
    delivery_type: DeliveryType,
    items: &[LineItem],
    limits: &GateLimits,
) -> Result<(), GateError> {
    if customer.name.trim().is_empty() {
        return Err(GateError::MissingName);
    }
    if !is_valid_phone(&customer.phone) {
        return Err(GateError::InvalidPhone(customer.phone.clone()));
    }
    if items.is_empty() {
        return Err(GateError::EmptyCart);
    }
    check_address(customer, delivery_type, limits)
}

/// Admin-entered orders skip the abuse checks but still need reachable contact details.
pub fn check_manual(
    customer: &Customer,
    delivery_type: DeliveryType,
    items: &[LineItem],
    limits: &GateLimits,
) -> Result<(), GateError> {
    if customer.name.trim().chars().count() < limits.min_name_chars {
        return Err(GateError::NameTooShort {
            min: limits.min_name_chars,
        });
    }
    if !is_valid_phone(&customer.phone) {
        return Err(GateError::InvalidPhone(customer.phone.clone()));
    }
    if items.is_empty() {
        return Err(GateError::EmptyCart);
    }
    // Admins may exceed the per-line cap, but every line needs at least one unit.
    if let Some(item) = items.iter().find(|i| i.quantity == 0) {
        return Err(GateError::ItemQuantity {
            item: item.name.clone(),
            max: limits.max_item_quantity,
        });
    }
    check_address(customer, delivery_type, limits)
}

pub fn check_observations(
    observations: Option<&str>,
    limits: &GateLimits,
) -> Result<(), GateError> {
    let len = observations.map(|o| o.chars().count()).unwrap_or(0);
    if len > limits.max_observation_chars {
        return Err(GateError::ObservationsTooLong {
            max: limits.max_observation_chars,
        });
    }
    Ok(())
}
