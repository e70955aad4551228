//! CSV ingest of prediction inputs.
//!
//! - Header names must match the seven column names; order is free and extra
//!   columns are ignored.
//! - A missing required header is a hard error (exit code 2).
//! - Rows that fail validation are skipped and reported with their line number.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Field, InputRecord};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: valid records plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedRecords {
    pub records: Vec<InputRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

pub fn read_records_csv(path: &Path) -> Result<IngestedRecords, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_records(file)
}

/// Same as `read_records_csv`, over any reader.
pub fn read_records<R: std::io::Read>(reader: R) -> Result<IngestedRecords, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let row = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&row, &columns) {
            Ok(record) => records.push(record),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    tracing::info!(
        rows_read,
        rows_used = records.len(),
        rows_skipped = row_errors.len(),
        "csv ingest finished"
    );

    Ok(IngestedRecords {
        records,
        row_errors,
        rows_read,
    })
}

fn resolve_columns(headers: &StringRecord) -> Result<HashMap<Field, usize>, AppError> {
    let mut columns = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        let name = header.trim().to_ascii_lowercase();
        if let Some(field) = Field::ALL.iter().find(|f| f.name() == name) {
            columns.entry(*field).or_insert(idx);
        }
    }

    let missing: Vec<&str> = Field::ALL
        .iter()
        .filter(|f| !columns.contains_key(*f))
        .map(|f| f.name())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::new(
            2,
            format!("CSV is missing required columns: {}", missing.join(", ")),
        ));
    }
    Ok(columns)
}

fn parse_row(row: &StringRecord, columns: &HashMap<Field, usize>) -> Result<InputRecord, String> {
    let get = |field: Field| -> Result<&str, String> {
        columns
            .get(&field)
            .and_then(|&idx| row.get(idx))
            .ok_or_else(|| format!("missing value for {}", field.name()))
    };
    let score = |field: Field| -> Result<f64, String> {
        let raw = get(field)?;
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid {} '{raw}'", field.name()))
    };

    InputRecord::new(
        get(Field::Gender)?,
        get(Field::RaceEthnicity)?,
        get(Field::ParentalLevelOfEducation)?,
        get(Field::Lunch)?,
        get(Field::TestPreparationCourse)?,
        score(Field::ReadingScore)?,
        score(Field::WritingScore)?,
    )
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "writing_score,reading_score,gender,race_ethnicity,parental_level_of_education,lunch,test_preparation_course,extra";

    #[test]
    fn reads_rows_in_any_column_order() {
        let csv = format!(
            "{HEADER}\n65,70,female,group B,bachelor's degree,standard,none,x\n 80 , 90 ,male,group E,master's degree,free/reduced,completed,y\n"
        );
        let out = read_records(csv.as_bytes()).unwrap();
        assert_eq!(out.rows_read, 2);
        assert!(out.row_errors.is_empty(), "{:?}", out.row_errors);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].reading_score(), 70.0);
        assert_eq!(out.records[0].writing_score(), 65.0);
        assert_eq!(out.records[1].reading_score(), 90.0);
    }

    #[test]
    fn skips_invalid_rows_with_line_numbers() {
        let csv = format!(
            "{HEADER}\n65,70,other,group B,bachelor's degree,standard,none,\n65,abc,female,group B,high school,standard,none,\n65,70,female,group B,high school,standard,none,\n"
        );
        let out = read_records(csv.as_bytes()).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.row_errors.len(), 2);
        assert_eq!(out.row_errors[0].line, 2);
        assert!(out.row_errors[0].message.contains("gender"), "{}", out.row_errors[0].message);
        assert_eq!(out.row_errors[1].line, 3);
        assert!(out.row_errors[1].message.contains("reading_score"));
    }

    #[test]
    fn missing_header_is_fatal() {
        let csv = "gender,lunch\nfemale,standard\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("race_ethnicity"), "{err}");
    }
}
