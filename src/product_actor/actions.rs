//! Custom actions for the Product actor.
//!
//! Both flags are toggled from the admin catalog screen; each action returns the product
//! as stored afterwards.

#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Marks the product as available or sold out. Sold-out products fail the price check.
    SetInStock(bool),
    /// Features or un-features the product on the chef's choice shelf.
    SetChefChoice(bool),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone)]
pub enum ProductActionResult {
    SetInStock(crate::model::Product),
    SetChefChoice(crate::model::Product),
}
