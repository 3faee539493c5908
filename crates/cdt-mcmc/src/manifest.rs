use std::fs;
use std::path::{Path, PathBuf};

use cdt_core::errors::{CdtError, ErrorInfo};
use cdt_triangulation::Geometry;
use serde::{Deserialize, Serialize};

use crate::config::MetropolisConfig;

/// Manifest describing a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Configuration used for the run.
    pub config: MetropolisConfig,
    /// Master seed of every random stream.
    pub master_seed: u64,
    /// Optional seed label captured from the configuration.
    pub seed_label: Option<String>,
    /// Canonical hash of the final triangulation.
    pub triangulation_hash: String,
    /// Geometry of the final manifold.
    pub final_geometry: Geometry,
    /// Metrics file relative to the run directory.
    pub metrics_file: Option<PathBuf>,
    /// Checkpoint files relative to the run directory, oldest first.
    pub checkpoints: Vec<PathBuf>,
    /// RFC 3339 timestamp of manifest creation.
    pub created_at: String,
}

impl RunManifest {
    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), CdtError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                CdtError::Serde(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            CdtError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            CdtError::Serde(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, CdtError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            CdtError::Serde(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            CdtError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}
