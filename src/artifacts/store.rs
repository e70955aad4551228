//! Load artifact JSON files from an artifact directory.
//!
//! Layout:
//!
//! ```text
//! <dir>/preprocessor.json   ColumnTransformer
//! <dir>/model.json          LinearModel
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::{ColumnTransformer, FeatureTransform, LinearModel, Regressor, FORMAT_VERSION};
use crate::error::ArtifactLoadError;

pub const MODEL_FILE: &str = "model.json";
pub const PREPROCESSOR_FILE: &str = "preprocessor.json";

/// Resolved locations of the two artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub preprocessor: PathBuf,
}

impl ArtifactPaths {
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            preprocessor: dir.join(PREPROCESSOR_FILE),
        }
    }
}

/// A loaded, mutually consistent preprocessor/model pair.
///
/// Cloning is cheap; both halves are shared read-only.
#[derive(Clone)]
pub struct Artifacts {
    pub preprocessor: Arc<dyn FeatureTransform>,
    pub model: Arc<dyn Regressor>,
}

impl Artifacts {
    /// Pair arbitrary implementations, checking that their widths agree.
    pub fn new(
        preprocessor: Arc<dyn FeatureTransform>,
        model: Arc<dyn Regressor>,
    ) -> Result<Self, ArtifactLoadError> {
        if preprocessor.n_features() != model.n_features() {
            return Err(ArtifactLoadError::Incompatible(format!(
                "preprocessor produces {} features but model expects {}",
                preprocessor.n_features(),
                model.n_features()
            )));
        }
        Ok(Self { preprocessor, model })
    }
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("n_features", &self.preprocessor.n_features())
            .finish()
    }
}

/// Load both artifacts and check that they fit together.
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<Artifacts, ArtifactLoadError> {
    tracing::info!(
        model = %paths.model.display(),
        preprocessor = %paths.preprocessor.display(),
        "loading artifacts"
    );
    let model = load_model(&paths.model)?;
    let preprocessor = load_preprocessor(&paths.preprocessor)?;
    Artifacts::new(Arc::new(preprocessor), Arc::new(model))
}

pub fn load_model(path: &Path) -> Result<LinearModel, ArtifactLoadError> {
    let model: LinearModel = read_json(path)?;
    check_version(path, model.format_version)?;
    model.validate().map_err(|reason| corrupt(path, reason))?;
    Ok(model)
}

pub fn load_preprocessor(path: &Path) -> Result<ColumnTransformer, ArtifactLoadError> {
    let preprocessor: ColumnTransformer = read_json(path)?;
    check_version(path, preprocessor.format_version)?;
    preprocessor.validate().map_err(|reason| corrupt(path, reason))?;
    Ok(preprocessor)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactLoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ArtifactLoadError::Missing {
            path: path.to_path_buf(),
        },
        _ => ArtifactLoadError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| corrupt(path, e.to_string()))
}

fn check_version(path: &Path, version: u32) -> Result<(), ArtifactLoadError> {
    if version == FORMAT_VERSION {
        Ok(())
    } else {
        Err(corrupt(
            path,
            format!("unsupported format_version {version} (expected {FORMAT_VERSION})"),
        ))
    }
}

fn corrupt(path: &Path, reason: impl Into<String>) -> ArtifactLoadError {
    ArtifactLoadError::Corrupt {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::TransformerBlock;

    #[test]
    fn paths_from_dir() {
        let paths = ArtifactPaths::from_dir("artifacts");
        assert_eq!(paths.model, PathBuf::from("artifacts").join("model.json"));
        assert_eq!(paths.preprocessor, PathBuf::from("artifacts").join("preprocessor.json"));
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let err = load_model(Path::new("definitely/not/here/model.json")).unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Missing { .. }), "{err}");
    }

    #[test]
    fn mismatched_widths_are_incompatible() {
        let preprocessor = ColumnTransformer::new(vec![TransformerBlock::OneHot {
            column: "gender".into(),
            categories: vec!["female".into(), "male".into()],
            scale: None,
        }]);
        let model = LinearModel::new(0.0, vec![1.0]);
        let err = Artifacts::new(Arc::new(preprocessor), Arc::new(model)).unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Incompatible(_)));
    }
}
