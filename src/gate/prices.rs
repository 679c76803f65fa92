//! Cart prices checked against the catalog.

use super::GateError;
use crate::clients::ProductClient;
use crate::config::GateLimits;
use crate::model::{line_subtotal, LineItem, Product};
use rust_decimal::Decimal;
use tracing::warn;

fn find<'a>(catalog: &'a [Product], item: &LineItem) -> Option<&'a Product> {
    item.product_id
        .and_then(|id| catalog.iter().find(|p| p.id == id))
        .or_else(|| catalog.iter().find(|p| p.is_named(&item.name)))
}

/// Compares each line against its catalog entry, then the cart subtotal against the catalog.
///
/// Lines with no catalog match skip the per-line checks but still count toward the
/// submitted subtotal, so an unknown line can drift it out of tolerance.
pub fn check_prices(
    items: &[LineItem],
    catalog: &[Product],
    limits: &GateLimits,
) -> Result<(), GateError> {
    let mut submitted = Decimal::ZERO;
    let mut expected = Decimal::ZERO;

    for item in items {
        let line = line_subtotal(item.unit_price, item.quantity);
        let Some(product) = find(catalog, item) else {
            warn!(item = %item.name, "Cart item not in catalog, skipping price check");
            submitted = line
                .and_then(|line| submitted.checked_add(line))
                .unwrap_or(Decimal::MAX);
            continue;
        };
        if !product.in_stock {
            return Err(GateError::OutOfStock {
                product: product.name.clone(),
            });
        }
        let drift = item.unit_price.checked_sub(product.price).map(|d| d.abs());
        if drift.map_or(true, |d| d > limits.unit_price_tolerance) {
            return Err(GateError::PriceMismatch {
                product: product.name.clone(),
                expected: product.price,
                submitted: item.unit_price,
            });
        }
        submitted = line
            .and_then(|line| submitted.checked_add(line))
            .unwrap_or(Decimal::MAX);
        expected = line_subtotal(product.price, item.quantity)
            .and_then(|line| expected.checked_add(line))
            .unwrap_or(Decimal::MAX);
    }

    let drift = submitted.checked_sub(expected).map(|d| d.abs());
    if drift.map_or(true, |d| d > limits.subtotal_tolerance) {
        return Err(GateError::SubtotalMismatch {
            expected,
            submitted,
        });
    }
    Ok(())
}

/// Fetches the catalog and runs [`check_prices`]. An unreachable catalog lets the order through.
pub async fn verify_against_catalog(
    items: &[LineItem],
    catalog: &ProductClient,
    limits: &GateLimits,
) -> Result<(), GateError> {
    match catalog.list_products().await {
        Ok(products) => check_prices(items, &products, limits),
        Err(e) => {
            warn!(error = %e, "Catalog unavailable, skipping price verification");
            Ok(())
        }
    }
}
