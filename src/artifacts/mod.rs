//! Pre-trained artifacts: a feature preprocessor and a regression model.
//!
//! The prediction service only depends on two capabilities, expressed as
//! traits so the concrete on-disk format stays a detail of this module:
//!
//! - `FeatureTransform`: frame -> numeric feature matrix
//! - `Regressor`: feature matrix -> one score per row

use nalgebra::DMatrix;

use crate::domain::FeatureFrame;
use crate::error::PredictionError;

pub mod model;
pub mod preprocessor;
pub mod store;

pub use model::*;
pub use preprocessor::*;
pub use store::*;

/// Artifact schema version understood by this build.
pub const FORMAT_VERSION: u32 = 1;

pub trait FeatureTransform: Send + Sync {
    /// Width of the matrix produced by `transform`.
    fn n_features(&self) -> usize;

    fn transform(&self, frame: &FeatureFrame) -> Result<DMatrix<f64>, PredictionError>;
}

pub trait Regressor: Send + Sync {
    /// Number of input features the model expects.
    fn n_features(&self) -> usize;

    fn predict_scores(&self, x: &DMatrix<f64>) -> Result<Vec<f64>, PredictionError>;
}
