//! Column transformer: standard scaling for numeric columns, one-hot encoding
//! for categorical ones.
//!
//! The output matrix is the horizontal concatenation of each block's output,
//! in the order the blocks are listed in the artifact.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::FeatureTransform;
use crate::domain::FeatureFrame;
use crate::error::PredictionError;

/// One block of the column transformer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformerBlock {
    /// `(x - mean) / scale` per column.
    StandardScaler {
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// One output per category; unknown values encode as all zeros.
    ///
    /// `scale`, when present, divides each output (scaling without centering).
    OneHot {
        column: String,
        categories: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scale: Option<Vec<f64>>,
    },
}

impl TransformerBlock {
    pub fn width(&self) -> usize {
        match self {
            TransformerBlock::StandardScaler { columns, .. } => columns.len(),
            TransformerBlock::OneHot { categories, .. } => categories.len(),
        }
    }

    /// Structural checks run once at load time.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            TransformerBlock::StandardScaler { columns, mean, scale } => {
                if columns.is_empty() {
                    return Err("standard_scaler has no columns".to_string());
                }
                if mean.len() != columns.len() || scale.len() != columns.len() {
                    return Err(format!(
                        "standard_scaler expects {} mean/scale values, got {}/{}",
                        columns.len(),
                        mean.len(),
                        scale.len()
                    ));
                }
                check_scale(scale)
            }
            TransformerBlock::OneHot {
                column,
                categories,
                scale,
            } => {
                if categories.is_empty() {
                    return Err(format!("one_hot for '{column}' has no categories"));
                }
                match scale {
                    Some(s) if s.len() != categories.len() => Err(format!(
                        "one_hot for '{column}' expects {} scale values, got {}",
                        categories.len(),
                        s.len()
                    )),
                    Some(s) => check_scale(s),
                    None => Ok(()),
                }
            }
        }
    }

    fn fill(
        &self,
        frame: &FeatureFrame,
        out: &mut DMatrix<f64>,
        offset: usize,
    ) -> Result<(), PredictionError> {
        match self {
            TransformerBlock::StandardScaler {
                columns,
                mean,
                scale,
            } => {
                for (j, name) in columns.iter().enumerate() {
                    let cells = frame.column(name).ok_or_else(|| missing_column(name))?;
                    let (Some(m), Some(s)) = (mean.get(j), scale.get(j)) else {
                        return Err(PredictionError::transform(format!(
                            "standard_scaler has no mean/scale for column '{name}'"
                        )));
                    };
                    for (i, cell) in cells.iter().enumerate() {
                        let x = cell.as_number().ok_or_else(|| {
                            PredictionError::transform(format!(
                                "could not convert '{cell}' to float in column '{name}'"
                            ))
                        })?;
                        out[(i, offset + j)] = (x - m) / s;
                    }
                }
            }
            TransformerBlock::OneHot {
                column,
                categories,
                scale,
            } => {
                let cells = frame.column(column).ok_or_else(|| missing_column(column))?;
                for (i, cell) in cells.iter().enumerate() {
                    let value = cell.as_text().ok_or_else(|| {
                        PredictionError::transform(format!(
                            "expected a category in column '{column}', got number {cell}"
                        ))
                    })?;
                    if let Some(k) = categories.iter().position(|c| c == value) {
                        let s = match scale {
                            Some(s) => *s.get(k).ok_or_else(|| {
                                PredictionError::transform(format!(
                                    "one_hot for '{column}' has no scale for '{value}'"
                                ))
                            })?,
                            None => 1.0,
                        };
                        out[(i, offset + k)] = 1.0 / s;
                    }
                }
            }
        }
        Ok(())
    }
}

#[track_caller]
fn missing_column(name: &str) -> PredictionError {
    PredictionError::transform(format!("columns are missing: {{'{name}'}}"))
}

fn check_scale(scale: &[f64]) -> Result<(), String> {
    if scale.iter().all(|s| s.is_finite() && *s != 0.0) {
        Ok(())
    } else {
        Err("scale values must be finite and non-zero".to_string())
    }
}

/// Serialized preprocessor document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformer {
    pub format_version: u32,
    pub transformers: Vec<TransformerBlock>,
}

impl ColumnTransformer {
    pub fn new(transformers: Vec<TransformerBlock>) -> Self {
        Self {
            format_version: super::FORMAT_VERSION,
            transformers,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.transformers.is_empty() {
            return Err("no transformers".to_string());
        }
        self.transformers.iter().try_for_each(TransformerBlock::validate)
    }
}

impl FeatureTransform for ColumnTransformer {
    fn n_features(&self) -> usize {
        self.transformers.iter().map(TransformerBlock::width).sum()
    }

    fn transform(&self, frame: &FeatureFrame) -> Result<DMatrix<f64>, PredictionError> {
        if let Err(reason) = self.validate() {
            return Err(PredictionError::transform(reason));
        }
        let mut out = DMatrix::zeros(frame.n_rows(), self.n_features());
        let mut offset = 0;
        for block in &self.transformers {
            block.fill(frame, &mut out, offset)?;
            offset += block.width();
        }
        Ok(out)
    }
}
