//! Shared "predict" workflow used by both CLI and TUI front-ends.
//!
//! record -> row -> transform -> predict -> score
//!
//! The front-ends only deal with collecting input and presenting output.

use crate::domain::{FeatureFrame, InputRecord};
use crate::error::PredictionError;
use crate::service::PredictionService;

/// Outputs of a single-record prediction.
#[derive(Debug, Clone)]
pub struct PredictionOutput {
    pub record: InputRecord,
    pub row: FeatureFrame,
    pub score: f64,
}

pub fn predict_record(
    service: &PredictionService,
    record: &InputRecord,
) -> Result<PredictionOutput, PredictionError> {
    let row = record.to_row();
    let scores = service.predict(&row)?;
    let score = match scores.as_slice() {
        [score] => *score,
        other => {
            return Err(PredictionError::predict(format!(
                "expected one score for one row, got {}",
                other.len()
            )));
        }
    };
    Ok(PredictionOutput {
        record: *record,
        row,
        score,
    })
}

/// Score many records in one transform/predict pass.
pub fn predict_batch(
    service: &PredictionService,
    records: &[InputRecord],
) -> Result<Vec<f64>, PredictionError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let frame = FeatureFrame::from_records(records);
    let scores = service.predict(&frame)?;
    if scores.len() != records.len() {
        return Err(PredictionError::predict(format!(
            "expected {} scores, got {}",
            records.len(),
            scores.len()
        )));
    }
    Ok(scores)
}
