//! Shared types and models for the Fabric Roll Ledger
//!
//! This crate holds the domain side of the system: sheet, stock and movement
//! models, input validation and the reconciliation planner. It performs no
//! I/O; the backend runs the plans built here inside a database transaction.

pub mod error;
pub mod models;
pub mod reconciliation;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use reconciliation::*;
pub use types::*;
pub use validation::*;
