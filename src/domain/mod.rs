//! Domain types.
//!
//! - validated input (`InputRecord`) and its categorical domains
//! - the tabular row fed to the preprocessor (`FeatureFrame`)

pub mod frame;
pub mod record;

pub use frame::*;
pub use record::*;
