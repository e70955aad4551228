//! Runtime configuration.
//!
//! Sources, highest priority first:
//!
//! 1. CLI overrides (`--artifacts`)
//! 2. process environment
//! 3. `.env` in the working directory (via `dotenvy`)
//! 4. built-in defaults

use std::path::PathBuf;

use crate::artifacts::ArtifactPaths;

pub const ENV_ARTIFACT_DIR: &str = "MATHSCORE_ARTIFACT_DIR";
pub const ENV_LOG_DIR: &str = "MATHSCORE_LOG_DIR";

pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub artifact_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment (loading `.env` first).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        Self {
            artifact_dir: get(ENV_ARTIFACT_DIR, DEFAULT_ARTIFACT_DIR),
            log_dir: get(ENV_LOG_DIR, DEFAULT_LOG_DIR),
        }
    }

    pub fn with_artifact_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.artifact_dir = dir;
        }
        self
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::from_dir(&self.artifact_dir)
    }
}
