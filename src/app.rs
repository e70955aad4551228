//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module:
//! - parses CLI arguments
//! - resolves configuration and starts logging
//! - builds the prediction service
//! - dispatches to the form, single prediction or batch mode

use clap::Parser;

use crate::cli::{BatchArgs, Command, PredictArgs};
use crate::config::AppConfig;
use crate::domain::InputRecord;
use crate::error::AppError;
use crate::service::PredictionService;

pub mod pipeline;

/// Entry point for the `mathscore` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let config = AppConfig::from_env().with_artifact_dir(cli.artifacts.clone());

    // A broken log directory should not stop predictions.
    match crate::logging::init(&config.log_dir) {
        Ok(path) => tracing::info!(log_file = %path.display(), "logging started"),
        Err(err) => eprintln!("warning: {err}"),
    }
    tracing::info!(
        artifact_dir = %config.artifact_dir.display(),
        reload = cli.reload,
        "configuration resolved"
    );

    match cli.command {
        Command::Tui => crate::tui::run(build_service(&config, cli.reload)),
        Command::Predict(args) => handle_predict(&config, cli.reload, &args),
        Command::Batch(args) => handle_batch(&config, cli.reload, &args),
    }
}

/// Service per CLI mode; `reload` defers loading to each call.
///
/// With eager loading, a load failure is reported on the first prediction
/// rather than at startup so the form still opens.
pub fn build_service(config: &AppConfig, reload: bool) -> PredictionService {
    let paths = config.artifact_paths();
    if reload {
        return PredictionService::per_call(paths);
    }
    match PredictionService::load(&paths) {
        Ok(service) => service,
        Err(err) => {
            tracing::warn!(
                kind = err.kind().as_str(),
                "artifacts failed to load at startup, falling back to per-call loading"
            );
            PredictionService::per_call(paths)
        }
    }
}

fn handle_predict(config: &AppConfig, reload: bool, args: &PredictArgs) -> Result<(), AppError> {
    let record = InputRecord::new(
        &args.gender,
        &args.race_ethnicity,
        &args.parental_level_of_education,
        &args.lunch,
        &args.test_preparation_course,
        f64::from(args.reading),
        f64::from(args.writing),
    )?;

    let service = build_service(config, reload);
    let output = pipeline::predict_record(&service, &record)?;

    println!("Input Data:");
    println!("{}", crate::report::format_input_table(&output.row));
    println!("{}", crate::report::format_prediction(output.score));
    Ok(())
}

fn handle_batch(config: &AppConfig, reload: bool, args: &BatchArgs) -> Result<(), AppError> {
    let ingested = crate::io::ingest::read_records_csv(&args.input)?;
    if ingested.records.is_empty() {
        return Err(AppError::new(
            2,
            format!(
                "No valid rows in '{}' ({} read, {} rejected).",
                args.input.display(),
                ingested.rows_read,
                ingested.row_errors.len()
            ),
        ));
    }

    let service = build_service(config, reload);
    let scores = pipeline::predict_batch(&service, &ingested.records)?;

    println!(
        "{}",
        crate::report::format_batch(&ingested.records, &scores, &ingested.row_errors)
    );

    if let Some(path) = &args.export {
        crate::io::export::write_predictions_csv(path, &ingested.records, &scores)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Rewrite argv so `mathscore` defaults to `mathscore tui`.
///
/// Rules:
/// - `mathscore`                     -> `mathscore tui`
/// - `mathscore --artifacts DIR ...` -> `mathscore tui --artifacts DIR ...`
/// - `mathscore --help/--version/-h` -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "predict" | "batch");
    if is_subcommand {
        return argv;
    }

    // Only flags before any subcommand: the form is implied.
    let has_subcommand = argv
        .iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "tui" | "predict" | "batch"));
    if arg1.starts_with('-') && !has_subcommand {
        argv.insert(1, "tui".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_the_form() {
        assert_eq!(rewrite_args(argv(&["mathscore"])), argv(&["mathscore", "tui"]));
    }

    #[test]
    fn leading_flags_imply_the_form() {
        assert_eq!(
            rewrite_args(argv(&["mathscore", "--artifacts", "dir"])),
            argv(&["mathscore", "tui", "--artifacts", "dir"])
        );
    }

    #[test]
    fn explicit_subcommands_are_untouched() {
        let args = argv(&["mathscore", "--reload", "batch", "--input", "x.csv"]);
        assert_eq!(rewrite_args(args.clone()), args);
        let args = argv(&["mathscore", "--help"]);
        assert_eq!(rewrite_args(args.clone()), args);
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn missing_artifacts_fall_back_to_per_call_loading() {
        let config = AppConfig::default().with_artifact_dir(Some("no/such/dir".into()));
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let service =
            tracing::subscriber::with_default(subscriber, || build_service(&config, false));
        assert!(!service.is_cached());
        assert!(!build_service(&config, true).is_cached());

        let logged = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("WARN"), "{logged}");
        assert!(logged.contains("falling back to per-call loading"), "{logged}");
    }
}
