//! Records stored in the desk's collections.

pub mod courier;
pub mod order;
pub mod product;

pub use courier::*;
pub use order::*;
pub use product::*;
