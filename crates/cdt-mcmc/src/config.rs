use std::fs;
use std::path::{Path, PathBuf};

use cdt_core::errors::{CdtError, ErrorInfo};
use cdt_core::{Couplings, DEFAULT_PRECISION_BITS, FOLIATION_SPACING, INITIAL_RADIUS};
use serde::{Deserialize, Serialize};

/// Smallest fixed-point width accepted for the acceptance arithmetic.
pub const MIN_PRECISION_BITS: u32 = 64;

/// Dimension of the simulated spacetime.
pub const SUPPORTED_DIMENSION: u32 = 3;

/// YAML-configurable parameters governing a Metropolis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetropolisConfig {
    /// Squared ratio of timelike to spacelike edge length.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Normalised inverse Newton constant.
    #[serde(default = "default_k")]
    pub k: f64,
    /// Normalised cosmological constant.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    /// Number of passes; each pass proposes one move per current simplex.
    #[serde(default = "default_passes")]
    pub passes: usize,
    /// Interval in passes between checkpoints (0 disables checkpoints).
    #[serde(default = "default_checkpoint")]
    pub checkpoint: usize,
    /// Fractional bits used by the extended precision arithmetic.
    #[serde(default = "default_precision_bits")]
    pub precision_bits: u32,
    /// Master seed and substream labelling.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Radius of the first timeslice, recorded in checkpoints.
    #[serde(default = "default_initial_radius")]
    pub initial_radius: f64,
    /// Radial spacing between timeslices, recorded in checkpoints.
    #[serde(default = "default_foliation_spacing")]
    pub foliation_spacing: f64,
    /// Starting manifold used by [`crate::simulate`].
    #[serde(default)]
    pub manifold: ManifoldConfig,
    /// Output directory configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_alpha() -> f64 {
    Couplings::default().alpha
}

fn default_k() -> f64 {
    Couplings::default().k
}

fn default_lambda() -> f64 {
    Couplings::default().lambda
}

fn default_passes() -> usize {
    100
}

fn default_checkpoint() -> usize {
    10
}

fn default_precision_bits() -> u32 {
    DEFAULT_PRECISION_BITS
}

fn default_initial_radius() -> f64 {
    INITIAL_RADIUS
}

fn default_foliation_spacing() -> f64 {
    FOLIATION_SPACING
}

impl Default for MetropolisConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            k: default_k(),
            lambda: default_lambda(),
            passes: default_passes(),
            checkpoint: default_checkpoint(),
            precision_bits: default_precision_bits(),
            seed_policy: SeedPolicy::default(),
            initial_radius: default_initial_radius(),
            foliation_spacing: default_foliation_spacing(),
            manifold: ManifoldConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl MetropolisConfig {
    /// Creates a configuration with the given couplings and schedule, other fields defaulted.
    pub fn new(alpha: f64, k: f64, lambda: f64, passes: usize, checkpoint: usize) -> Self {
        Self {
            alpha,
            k,
            lambda,
            passes,
            checkpoint,
            ..Self::default()
        }
    }

    /// The coupling triple of the action.
    pub fn couplings(&self) -> Couplings {
        Couplings::new(self.alpha, self.k, self.lambda)
    }

    /// Parses a configuration from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CdtError> {
        serde_yaml::from_str(yaml)
            .map_err(|err| CdtError::Config(ErrorInfo::new("config-parse", err.to_string())))
    }

    /// Loads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, CdtError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            CdtError::Serde(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&contents).map_err(|err| {
            let info = err.info().clone().with_context("path", path.display().to_string());
            CdtError::Config(info)
        })
    }

    /// Rejects configurations the engine cannot run.
    pub fn validate(&self) -> Result<(), CdtError> {
        for (name, value) in [("alpha", self.alpha), ("k", self.k), ("lambda", self.lambda)] {
            if !value.is_finite() {
                return Err(CdtError::Config(
                    ErrorInfo::new("non-finite-coupling", "couplings must be finite")
                        .with_context("coupling", name)
                        .with_context("value", value.to_string()),
                ));
            }
        }
        if !self.couplings().is_physical() {
            return Err(CdtError::Config(
                ErrorInfo::new("non-positive-alpha", "alpha must be positive")
                    .with_context("alpha", self.alpha.to_string()),
            ));
        }
        if self.passes == 0 {
            return Err(CdtError::Config(
                ErrorInfo::new("zero-passes", "a run needs at least one pass")
                    .with_hint("set passes to 1 or more"),
            ));
        }
        if self.precision_bits < MIN_PRECISION_BITS {
            return Err(CdtError::Config(
                ErrorInfo::new("insufficient-precision", "extended precision is too narrow")
                    .with_context("precision_bits", self.precision_bits.to_string())
                    .with_hint(format!("use at least {MIN_PRECISION_BITS} bits")),
            ));
        }
        self.manifold.validate()
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed from which every random stream of the run is derived.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in manifests.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x0CD7_5EED_0000_0001
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// Starting manifold parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifoldConfig {
    /// Spacetime dimension; only 3 is supported.
    #[serde(default = "default_dimension")]
    pub dimension: u32,
    /// Desired number of 3-simplices.
    #[serde(default = "default_simplices")]
    pub simplices: usize,
    /// Desired number of timeslices.
    #[serde(default = "default_timeslices")]
    pub timeslices: usize,
}

fn default_dimension() -> u32 {
    SUPPORTED_DIMENSION
}

fn default_simplices() -> usize {
    640
}

fn default_timeslices() -> usize {
    4
}

impl Default for ManifoldConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            simplices: default_simplices(),
            timeslices: default_timeslices(),
        }
    }
}

impl ManifoldConfig {
    fn validate(&self) -> Result<(), CdtError> {
        if self.dimension != SUPPORTED_DIMENSION {
            return Err(CdtError::Config(
                ErrorInfo::new("unsupported-dimension", "only 3-dimensional manifolds are supported")
                    .with_context("dimension", self.dimension.to_string()),
            ));
        }
        Ok(())
    }
}

/// Output directory layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for run artefacts. Nothing is written when unset.
    #[serde(default)]
    pub run_directory: Option<PathBuf>,
    /// Subdirectory for checkpoint files.
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,
    /// Metrics filename relative to `run_directory`.
    #[serde(default = "default_metrics_filename")]
    pub metrics_file: PathBuf,
    /// Manifest filename relative to `run_directory`.
    #[serde(default = "default_manifest_filename")]
    pub manifest_file: PathBuf,
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from("checkpoints")
}

fn default_metrics_filename() -> PathBuf {
    PathBuf::from("metrics.csv")
}

fn default_manifest_filename() -> PathBuf {
    PathBuf::from("manifest.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            run_directory: None,
            checkpoint_dir: default_checkpoint_dir(),
            metrics_file: default_metrics_filename(),
            manifest_file: default_manifest_filename(),
        }
    }
}
