//! Reporting utilities.

pub mod format;

pub use format::*;
