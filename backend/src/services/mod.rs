//! Services for the Fabric Roll Ledger
//!
//! `production` and `stock` are the entry points used by handlers. The store
//! modules run single statements on a connection owned by the caller.

pub mod movement_journal;
pub mod production;
pub mod sheet_store;
pub mod stock;
pub mod stock_ledger;

pub use production::ProductionService;
pub use stock::StockService;
