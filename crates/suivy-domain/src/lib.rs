//! suivy-domain
//!
//! Pure domain models (Provider, PurchaseOrder, Payment, Catalog, consumption
//! histories, report rows). No I/O, no CLI, no storage. Only data types and
//! core enums.

pub mod catalog;
pub mod common;
pub mod consumption;
pub mod order;
pub mod payment;
pub mod provider;
pub mod report;

pub use catalog::*;
pub use common::*;
pub use consumption::*;
pub use order::*;
pub use payment::*;
pub use provider::*;
pub use report::*;
