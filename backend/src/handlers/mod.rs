//! HTTP request handlers

pub mod health;
pub mod sheets;
pub mod stock;

pub use health::*;
pub use sheets::*;
pub use stock::*;
