//! Error types.
//!
//! - `InvalidValueError`: a categorical input outside its allowed domain.
//! - `ArtifactLoadError`: a preprocessor/model file that could not be loaded.
//! - `PredictionError`: anything that went wrong inside the prediction pipeline,
//!   tagged with a kind and the source location that raised it.
//! - `AppError`: what the binary prints before exiting with a status code.

use std::fmt;
use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Field;

/// A categorical value that is not part of its field's allowed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {}: '{value}'. Valid options are [{}].", .field.name(), fmt_allowed(.allowed))]
pub struct InvalidValueError {
    pub field: Field,
    pub value: String,
    pub allowed: &'static [&'static str],
}

fn fmt_allowed(allowed: &[&str]) -> String {
    allowed
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure to obtain a usable artifact from disk.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact not found: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to read artifact '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt artifact '{}': {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("incompatible artifacts: {0}")]
    Incompatible(String),
}

/// Which pipeline stage produced a `PredictionError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionErrorKind {
    ArtifactLoad,
    Transform,
    Predict,
}

impl PredictionErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PredictionErrorKind::ArtifactLoad => "artifact load",
            PredictionErrorKind::Transform => "transform",
            PredictionErrorKind::Predict => "predict",
        }
    }
}

/// A failure anywhere in load -> transform -> predict.
///
/// The location is captured with `#[track_caller]`, so it points at the line
/// that constructed the error rather than at this module.
#[derive(Debug, Clone)]
pub struct PredictionError {
    kind: PredictionErrorKind,
    message: String,
    location: &'static Location<'static>,
}

impl PredictionError {
    #[track_caller]
    pub fn new(kind: PredictionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub fn transform(message: impl Into<String>) -> Self {
        Self::new(PredictionErrorKind::Transform, message)
    }

    #[track_caller]
    pub fn predict(message: impl Into<String>) -> Self {
        Self::new(PredictionErrorKind::Predict, message)
    }

    pub fn kind(&self) -> PredictionErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl From<ArtifactLoadError> for PredictionError {
    #[track_caller]
    fn from(err: ArtifactLoadError) -> Self {
        Self::new(PredictionErrorKind::ArtifactLoad, err.to_string())
    }
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Prediction failed ({}) at [{}:{}]: {}",
            self.kind.as_str(),
            self.location.file(),
            self.location.line(),
            self.message
        )
    }
}

impl std::error::Error for PredictionError {}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<InvalidValueError> for AppError {
    fn from(err: InvalidValueError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
