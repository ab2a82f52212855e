//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - cleaned-series and impact-table exports (`export`)
//! - impact-table JSON read/write (`table`)

pub mod export;
pub mod ingest;
pub mod table;

pub use export::*;
pub use ingest::*;
pub use table::*;
