use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use cdt_core::errors::{CdtError, ErrorInfo};
use cdt_core::{RunProvenance, SchemaVersion};
use cdt_triangulation::{canonical_hash, triangulation_from_json, triangulation_to_json, Manifold};
use serde::{Deserialize, Serialize};

use crate::config::SUPPORTED_DIMENSION;

/// Topology label written into checkpoints.
pub const TOPOLOGY: &str = "s2xs1";

const CHECKPOINT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Descriptive metadata stored alongside a checkpointed manifold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Topology of the manifold.
    pub topology: String,
    /// Spacetime dimension.
    pub dimension: u32,
    /// Number of 3-simplices.
    pub n3: usize,
    /// Largest timeslice label.
    pub max_time: u32,
    /// Radius of the first timeslice.
    pub initial_radius: f64,
    /// Radial spacing between timeslices.
    pub foliation_spacing: f64,
    /// Pass after which the checkpoint was taken.
    pub pass: usize,
}

impl CheckpointMetadata {
    /// Metadata describing `manifold` after `pass`.
    pub fn new(manifold: &Manifold, initial_radius: f64, foliation_spacing: f64, pass: usize) -> Self {
        Self {
            topology: TOPOLOGY.to_string(),
            dimension: SUPPORTED_DIMENSION,
            n3: manifold.n3(),
            max_time: manifold.max_time(),
            initial_radius,
            foliation_spacing,
            pass,
        }
    }
}

/// Serializable checkpoint of one manifold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointPayload {
    /// Schema of this payload.
    pub schema_version: SchemaVersion,
    /// Seed, timestamp and triangulation hash.
    pub provenance: RunProvenance,
    /// Manifold metadata.
    pub metadata: CheckpointMetadata,
    /// Triangulation in its JSON form.
    pub triangulation: String,
}

impl CheckpointPayload {
    /// Captures `manifold` with its metadata.
    pub fn build(manifold: &Manifold, metadata: CheckpointMetadata, seed: u64) -> Result<Self, CdtError> {
        let triangulation = manifold.get_triangulation();
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            env!("CARGO_PKG_NAME").to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        Ok(Self {
            schema_version: CHECKPOINT_SCHEMA,
            provenance: RunProvenance {
                triangulation_hash: canonical_hash(triangulation),
                seed,
                created_at: chrono::Utc::now().to_rfc3339(),
                tool_versions,
            },
            metadata,
            triangulation: triangulation_to_json(triangulation)?,
        })
    }

    /// Rebuilds the manifold, checking it against the recorded hash.
    pub fn restore(&self) -> Result<Manifold, CdtError> {
        if self.schema_version.major != CHECKPOINT_SCHEMA.major {
            return Err(CdtError::Serde(
                ErrorInfo::new("schema-mismatch", "unsupported checkpoint schema")
                    .with_context("major", self.schema_version.major.to_string()),
            ));
        }
        let triangulation = triangulation_from_json(&self.triangulation)?;
        let hash = canonical_hash(&triangulation);
        if hash != self.provenance.triangulation_hash {
            return Err(CdtError::Serde(
                ErrorInfo::new("checkpoint-hash-mismatch", "triangulation does not match its recorded hash")
                    .with_context("expected", self.provenance.triangulation_hash.clone())
                    .with_context("actual", hash),
            ));
        }
        Ok(Manifold::from_triangulation(triangulation))
    }

    /// Restores the payload from disk.
    pub fn load(path: &Path) -> Result<Self, CdtError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            CdtError::Serde(
                ErrorInfo::new("checkpoint-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            CdtError::Serde(
                ErrorInfo::new("checkpoint-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Writes the payload to disk.
    pub fn store(&self, path: &Path) -> Result<(), CdtError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                CdtError::Serde(
                    ErrorInfo::new("checkpoint-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            CdtError::Serde(
                ErrorInfo::new("checkpoint-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            CdtError::Serde(
                ErrorInfo::new("checkpoint-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Writes a checkpoint of `manifold` into `directory` and returns its path.
pub fn write_file(
    directory: &Path,
    manifold: &Manifold,
    metadata: CheckpointMetadata,
    seed: u64,
) -> Result<PathBuf, CdtError> {
    let path = checkpoint_path(directory, metadata.pass);
    let payload = CheckpointPayload::build(manifold, metadata, seed)?;
    payload.store(&path)?;
    log::info!("checkpoint written to {}", path.display());
    Ok(path)
}

/// Deterministic checkpoint file path for a pass.
pub fn checkpoint_path(root: &Path, pass: usize) -> PathBuf {
    root.join(format!("ckpt_{pass:05}.json"))
}
