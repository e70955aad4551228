//! Prediction service: artifacts in, scores out.
//!
//! Two loading modes:
//!
//! - `PredictionService::load` reads the artifacts once and shares them
//!   read-only for every later call
//! - `PredictionService::per_call` re-reads both files on every `predict`
//!
//! Every failure leaves this module as a `PredictionError`, logged at the
//! point it is surfaced.

use crate::artifacts::{ArtifactPaths, Artifacts, load_artifacts};
use crate::domain::FeatureFrame;
use crate::error::PredictionError;

#[derive(Debug)]
enum Source {
    Cached(Artifacts),
    PerCall(ArtifactPaths),
}

#[derive(Debug)]
pub struct PredictionService {
    source: Source,
}

impl PredictionService {
    /// Load both artifacts now and reuse them for every call.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, PredictionError> {
        let artifacts = load_artifacts(paths).map_err(|e| log_failure(e.into()))?;
        Ok(Self::from_artifacts(artifacts))
    }

    /// Defer loading to each `predict` call.
    pub fn per_call(paths: ArtifactPaths) -> Self {
        Self {
            source: Source::PerCall(paths),
        }
    }

    /// Wrap already-loaded artifacts (or test doubles).
    pub fn from_artifacts(artifacts: Artifacts) -> Self {
        Self {
            source: Source::Cached(artifacts),
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self.source, Source::Cached(_))
    }

    /// Transform `row` and score it; returns one score per frame row.
    pub fn predict(&self, row: &FeatureFrame) -> Result<Vec<f64>, PredictionError> {
        tracing::info!(rows = row.n_rows(), "starting prediction");
        self.run(row).map_err(log_failure)
    }

    fn run(&self, row: &FeatureFrame) -> Result<Vec<f64>, PredictionError> {
        let loaded;
        let artifacts = match &self.source {
            Source::Cached(artifacts) => artifacts,
            Source::PerCall(paths) => {
                loaded = load_artifacts(paths)?;
                &loaded
            }
        };

        let x = artifacts.preprocessor.transform(row)?;
        tracing::debug!(rows = x.nrows(), cols = x.ncols(), "input features transformed");

        let scores = artifacts.model.predict_scores(&x)?;
        tracing::info!(?scores, "prediction made");
        Ok(scores)
    }
}

fn log_failure(err: PredictionError) -> PredictionError {
    tracing::error!(
        kind = err.kind().as_str(),
        file = err.location().file(),
        line = err.location().line(),
        "prediction failed: {}",
        err.message()
    );
    err
}
