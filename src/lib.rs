//! Reconcile wire-mesh manufacturing demand against available and incoming
//! wire-coil inventory, producing a per-diameter supply/shortage overview.
//!
//! The pipeline runs strictly forward: customer order sheets are extracted
//! and weighed, pending demand is aggregated by wire diameter, and the
//! result is merged with coil balances, incoming supplier stock and a
//! monthly-usage baseline. Supplier toggling is a pure view over the merged
//! overview, see [`Reconciliation::availability`].

pub mod dates;
pub mod demand;
pub mod error;
pub mod export;
pub mod extract;
pub mod inventory;
pub mod model;
pub mod overview;
pub mod schema;
pub mod weights;
pub mod workbook;

pub use dates::{DateConvention, DateRules};
pub use error::StockError;
pub use model::{Reconciliation, StockModel};
pub use workbook::{Cell, Sheet, Workbook};
