//! Linear regression model.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::Regressor;
use crate::error::PredictionError;

/// Serialized model document.
///
/// `score = intercept + Σ coefficients[j] * x[j]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub format_version: u32,
    /// Free-form name of the estimator that produced the weights.
    #[serde(default)]
    pub estimator: String,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            format_version: super::FORMAT_VERSION,
            estimator: "linear".to_string(),
            intercept,
            coefficients,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("model has no coefficients".to_string());
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("model weights must be finite".to_string());
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_scores(&self, x: &DMatrix<f64>) -> Result<Vec<f64>, PredictionError> {
        if x.ncols() != self.coefficients.len() {
            return Err(PredictionError::predict(format!(
                "X has {} features, but the model is expecting {} features as input",
                x.ncols(),
                self.coefficients.len()
            )));
        }

        let w = DVector::from_column_slice(&self.coefficients);
        let y = x * w;
        let scores: Vec<f64> = y.iter().map(|v| v + self.intercept).collect();

        if let Some(idx) = scores.iter().position(|v| !v.is_finite()) {
            return Err(PredictionError::predict(format!("non-finite score for row {idx}")));
        }
        Ok(scores)
    }
}
