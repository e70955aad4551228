//! Formatted terminal output.
//!
//! Formatting lives here so the CLI and the TUI render the same text.

use crate::domain::{FeatureFrame, InputRecord};
use crate::io::ingest::RowError;

/// Render a frame as an aligned text table with a row index column.
pub fn format_input_table(frame: &FeatureFrame) -> String {
    let headers: Vec<String> = std::iter::once(String::new())
        .chain(frame.column_names().iter().map(|s| s.to_string()))
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(frame.n_rows());
    for i in 0..frame.n_rows() {
        let mut row = vec![i.to_string()];
        row.extend(frame.columns().iter().map(|c| c.values[i].to_string()));
        rows.push(row);
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&join_padded(&headers, &widths));
    out.push('\n');
    for row in &rows {
        out.push_str(&join_padded(row, &widths));
        out.push('\n');
    }
    out
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn format_prediction(score: f64) -> String {
    format!("Predicted Math Score: {score:.2}")
}

/// Summary for a batch run: scores per record plus skipped rows.
pub fn format_batch(records: &[InputRecord], scores: &[f64], row_errors: &[RowError]) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== mathscore batch: {} predictions ===\n", scores.len()));
    for (idx, (record, score)) in records.iter().zip(scores).enumerate() {
        out.push_str(&format!(
            "{idx:>4}  reading={:<5} writing={:<5} -> {score:.2}\n",
            record.reading_score(),
            record.writing_score(),
        ));
    }

    if !row_errors.is_empty() {
        out.push_str(&format!("\nSkipped rows ({}):\n", row_errors.len()));
        for e in row_errors {
            out.push_str(&format!("  line {}: {}\n", e.line, e.message));
        }
    }
    out
}
