//! Column-major feature table.
//!
//! The preprocessor consumes named columns rather than structs, the same shape
//! a batch-oriented ML API expects. A single prediction is a frame with one
//! row; CSV batches are frames with many rows.

use std::fmt;

use super::{Field, InputRecord};

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

/// Named columns of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureFrame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl FeatureFrame {
    /// Frame with the seven input columns, one row per record.
    pub fn from_records(records: &[InputRecord]) -> Self {
        let columns = Field::ALL
            .iter()
            .map(|&field| Column {
                name: field.name().to_string(),
                values: records.iter().map(|r| r.cell(field)).collect(),
            })
            .collect();
        let frame = Self {
            columns,
            n_rows: records.len(),
        };
        tracing::debug!(rows = frame.n_rows, "feature frame built");
        frame
    }

    /// Build from arbitrary columns.
    ///
    /// Returns `None` if the columns disagree on length.
    pub fn from_columns(columns: Vec<Column>) -> Option<Self> {
        let n_rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if columns.iter().any(|c| c.values.len() != n_rows) {
            return None;
        }
        Some(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_row_has_seven_ordered_single_element_columns() {
        let record = InputRecord::new(
            "female",
            "group B",
            "bachelor's degree",
            "standard",
            "none",
            70.0,
            65.0,
        )
        .unwrap();
        let row = record.to_row();

        assert_eq!(row.n_rows(), 1);
        assert_eq!(
            row.column_names(),
            vec![
                "gender",
                "race_ethnicity",
                "parental_level_of_education",
                "lunch",
                "test_preparation_course",
                "reading_score",
                "writing_score",
            ]
        );
        for col in row.columns() {
            assert_eq!(col.values.len(), 1, "column {}", col.name);
        }
        assert_eq!(row.column("gender").unwrap()[0], Cell::Text("female".into()));
        assert_eq!(row.column("race_ethnicity").unwrap()[0], Cell::Text("group B".into()));
        assert_eq!(
            row.column("parental_level_of_education").unwrap()[0],
            Cell::Text("bachelor's degree".into())
        );
        assert_eq!(row.column("lunch").unwrap()[0], Cell::Text("standard".into()));
        assert_eq!(row.column("test_preparation_course").unwrap()[0], Cell::Text("none".into()));
        assert_eq!(row.column("reading_score").unwrap()[0], Cell::Number(70.0));
        assert_eq!(row.column("writing_score").unwrap()[0], Cell::Number(65.0));
    }

    #[test]
    fn from_records_stacks_rows() {
        let a = InputRecord::new("male", "group A", "high school", "standard", "none", 10.0, 20.0)
            .unwrap();
        let b = InputRecord::new(
            "female",
            "group E",
            "some college",
            "free/reduced",
            "completed",
            30.0,
            40.0,
        )
        .unwrap();
        let frame = FeatureFrame::from_records(&[a, b]);
        assert_eq!(frame.n_rows(), 2);
        let reading = frame.column("reading_score").unwrap();
        assert_eq!(reading, &[Cell::Number(10.0), Cell::Number(30.0)]);
    }

    #[test]
    fn from_columns_rejects_ragged_input() {
        let ragged = vec![
            Column {
                name: "a".into(),
                values: vec![Cell::Number(1.0)],
            },
            Column {
                name: "b".into(),
                values: vec![],
            },
        ];
        assert!(FeatureFrame::from_columns(ragged).is_none());
    }
}
