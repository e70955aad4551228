//! Input/output helpers.
//!
//! - CSV ingest of input records (`ingest`)
//! - CSV export of predictions (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
