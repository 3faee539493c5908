#![deny(missing_docs)]

//! Metropolis-Hastings sampler for causal dynamical triangulations.
//!
//! A [`Metropolis`] engine proposes ergodic moves, weighs them with the
//! bulk action at extended precision, and executes the accepted ones in
//! order through a [`MoveCommand`] that works on its own copy of the
//! manifold.

/// Bulk action and per-move count changes.
pub mod action;
/// Checkpoint payloads and file helpers.
pub mod checkpoint;
/// FIFO move queue with per-execution ledgers.
pub mod command;
/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic seed derivation helpers.
pub mod determinism;
/// Run manifest serialization.
pub mod manifest;
/// The pass loop and acceptance rule.
pub mod metropolis;
/// Per-pass metrics collection.
pub mod metrics;
/// The six move operations.
pub mod moves;
/// Fixed-point extended precision arithmetic.
pub mod precision;
/// Per-move-type counters.
pub mod tracker;

pub use action::{ActionCoefficients, ActionDelta, BulkAction};
pub use checkpoint::{write_file, CheckpointMetadata, CheckpointPayload};
pub use command::{MoveCommand, MoveFailure};
pub use config::{ManifoldConfig, MetropolisConfig, OutputConfig, SeedPolicy};
pub use metropolis::{simulate, Metropolis, RunSummary};
pub use metrics::{MetricsRecorder, PassSample};
pub use moves::{
    check_move, do_23_move, do_26_move, do_32_move, do_44_move, do_62_move, null_move,
    MoveOperation,
};
pub use precision::Fixed;
pub use tracker::MoveTracker;
