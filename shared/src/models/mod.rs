//! Domain models for the Fabric Roll Ledger

mod movement;
mod sheet;
mod stock;

pub use movement::*;
pub use sheet::*;
pub use stock::*;
