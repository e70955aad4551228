//! Command-line parsing for the math score predictor.
//!
//! Argument parsing and command dispatch stay separate from the prediction code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "mathscore",
    version,
    about = "Predict a student's math score from a pre-trained model"
)]
pub struct Cli {
    /// Directory holding `model.json` and `preprocessor.json`.
    ///
    /// Overrides MATHSCORE_ARTIFACT_DIR.
    #[arg(long, global = true, value_name = "DIR")]
    pub artifacts: Option<PathBuf>,

    /// Re-read the artifacts on every prediction instead of once at startup.
    #[arg(long, global = true)]
    pub reload: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form (default).
    Tui,
    /// Predict the score for a single record given on the command line.
    Predict(PredictArgs),
    /// Predict scores for every row of a CSV file.
    Batch(BatchArgs),
}

/// One record's fields. Categorical values are validated, not parsed by clap,
/// so invalid input produces the same error as the form.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// female | male
    #[arg(long)]
    pub gender: String,

    /// "group A" .. "group E"
    #[arg(long)]
    pub race_ethnicity: String,

    /// e.g. "bachelor's degree", "some high school"
    #[arg(long = "parental-education")]
    pub parental_level_of_education: String,

    /// standard | free/reduced
    #[arg(long)]
    pub lunch: String,

    /// none | completed
    #[arg(long = "test-prep")]
    pub test_preparation_course: String,

    /// Reading score (0-100).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub reading: u8,

    /// Writing score (0-100).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub writing: u8,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// CSV with the seven input columns.
    #[arg(long, value_name = "CSV")]
    pub input: PathBuf,

    /// Write inputs plus predictions to this CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}
