//! Export batch predictions to CSV.
//!
//! One line per record: the seven input columns followed by the predicted score.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Field, InputRecord};
use crate::error::AppError;

pub const SCORE_COLUMN: &str = "math_score_pred";

pub fn write_predictions_csv(
    path: &Path,
    records: &[InputRecord],
    scores: &[f64],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    write_predictions(file, records, scores)
}

pub fn write_predictions<W: Write>(
    writer: W,
    records: &[InputRecord],
    scores: &[f64],
) -> Result<(), AppError> {
    if records.len() != scores.len() {
        return Err(AppError::new(
            3,
            format!("{} records but {} scores", records.len(), scores.len()),
        ));
    }

    let mut out = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
    header.push(SCORE_COLUMN);
    out.write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (record, score) in records.iter().zip(scores) {
        let mut row: Vec<String> = Field::ALL.iter().map(|&f| record.cell(f).to_string()).collect();
        row.push(format!("{score:.4}"));
        out.write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
