//! Reasons a submission is turned away before it is stored.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GateError {
    /// A hidden form field was filled in.
    #[error("Submission rejected")]
    Honeypot,

    #[error("Customer name is required")]
    MissingName,

    #[error("Phone must be +569 followed by 8 digits: {0}")]
    InvalidPhone(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Delivery address must have at least {min} characters")]
    AddressTooShort { min: usize },

    #[error("Observations exceed {max} characters")]
    ObservationsTooLong { max: usize },

    #[error("Quantity of {item} must be between 1 and {max}")]
    ItemQuantity { item: String, max: u32 },

    #[error("Order has {units} units, the limit is {max}")]
    TooManyUnits { units: u32, max: u32 },

    #[error("Order value {value} exceeds {max}")]
    OrderValueTooHigh { value: Decimal, max: Decimal },

    #[error("Customer name looks like a test entry")]
    SuspiciousName,

    #[error("Customer name must have at least {min} characters")]
    NameTooShort { min: usize },

    #[error("Customer name must contain letters")]
    NameWithoutLetters,

    #[error("Daily limit of {limit} orders reached")]
    DailyLimit { limit: usize },

    #[error("Wait {seconds} seconds before placing another order")]
    TooSoon { seconds: u64 },

    #[error("Too many recent orders, wait a few minutes")]
    TooManyRecent,

    #[error("{product} is out of stock")]
    OutOfStock { product: String },

    #[error("Price of {product} is {expected}, cart says {submitted}")]
    PriceMismatch {
        product: String,
        expected: Decimal,
        submitted: Decimal,
    },

    #[error("Subtotal should be {expected}, cart says {submitted}")]
    SubtotalMismatch { expected: Decimal, submitted: Decimal },
}
