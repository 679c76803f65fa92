//! Numeric sales summaries over delivered orders.

pub mod sales;

pub use sales::*;
