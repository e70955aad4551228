//! `math-score` library crate.
//!
//! The binary (`mathscore`) is a thin wrapper around this library so that:
//!
//! - the prediction pipeline is testable without a terminal
//! - the form, the CLI and batch mode share one code path

pub mod app;
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod service;
pub mod tui;
