use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use cdt_core::errors::{CdtError, ErrorInfo};
use cdt_core::{MoveType, RngHandle};
use cdt_triangulation::{canonical_hash, Geometry, Manifold};
use serde::{Deserialize, Serialize};

use crate::action::BulkAction;
use crate::checkpoint::{self, CheckpointMetadata};
use crate::command::MoveCommand;
use crate::config::MetropolisConfig;
use crate::determinism;
use crate::manifest::RunManifest;
use crate::metrics::{MetricsRecorder, PassSample};
use crate::precision::Fixed;
use crate::tracker::MoveTracker;

/// Statistics returned to callers after a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Proposals per move type.
    pub trial: MoveTracker,
    /// Accepted proposals per move type.
    pub accepted: MoveTracker,
    /// Rejected proposals per move type.
    pub rejected: MoveTracker,
    /// Moves executed per move type.
    pub attempted: MoveTracker,
    /// Executed moves that succeeded.
    pub succeeded: MoveTracker,
    /// Executed moves that failed.
    pub failed: MoveTracker,
    /// Accepted over proposed, keyed by move label.
    pub acceptance_rates: BTreeMap<String, f64>,
    /// Geometry at the end of the run.
    pub final_geometry: Geometry,
    /// Distinct triangulations seen at pass boundaries.
    pub unique_states: usize,
    /// One sample per pass.
    pub samples: Vec<PassSample>,
    /// Checkpoint files written.
    pub checkpoints: Vec<PathBuf>,
    /// Metrics CSV, if written.
    pub metrics_path: Option<PathBuf>,
    /// Run manifest, if written.
    pub manifest_path: Option<PathBuf>,
}

/// Metropolis-Hastings driver over the ergodic moves.
///
/// Each pass proposes one move per simplex, accepts with probability
/// `A1 * A2`, and executes the accepted moves through a single
/// [`MoveCommand`].
#[derive(Debug)]
pub struct Metropolis {
    config: MetropolisConfig,
    action: BulkAction,
    rng: RngHandle,
    geometry: Geometry,
    trial: MoveTracker,
    accepted: MoveTracker,
    rejected: MoveTracker,
    attempted: MoveTracker,
    succeeded: MoveTracker,
    failed: MoveTracker,
    recorder: MetricsRecorder,
    checkpoints: Vec<PathBuf>,
    metrics_path: Option<PathBuf>,
    manifest_path: Option<PathBuf>,
}

impl Metropolis {
    /// Builds an engine whose proposal stream is derived from the master seed.
    pub fn new(config: MetropolisConfig) -> Result<Self, CdtError> {
        let rng = RngHandle::from_seed(determinism::proposal_seed(config.seed_policy.master_seed));
        Self::with_rng(config, rng)
    }

    /// Builds an engine drawing proposals and acceptance values from `rng`.
    pub fn with_rng(config: MetropolisConfig, rng: RngHandle) -> Result<Self, CdtError> {
        config.validate()?;
        let action = BulkAction::new(&config.couplings(), config.precision_bits)?;
        Ok(Self {
            config,
            action,
            rng,
            geometry: Geometry::default(),
            trial: MoveTracker::new(),
            accepted: MoveTracker::new(),
            rejected: MoveTracker::new(),
            attempted: MoveTracker::new(),
            succeeded: MoveTracker::new(),
            failed: MoveTracker::new(),
            recorder: MetricsRecorder::new(),
            checkpoints: Vec::new(),
            metrics_path: None,
            manifest_path: None,
        })
    }

    /// The configuration.
    pub fn config(&self) -> &MetropolisConfig {
        &self.config
    }

    /// The bulk action used for A2.
    pub fn action(&self) -> &BulkAction {
        &self.action
    }

    /// Geometry the acceptance probabilities are computed from.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Replaces the geometry snapshot.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    /// Proposals per move type.
    pub fn get_trial(&self) -> MoveTracker {
        self.trial
    }

    /// Accepted proposals per move type.
    pub fn get_accepted(&self) -> MoveTracker {
        self.accepted
    }

    /// Rejected proposals per move type.
    pub fn get_rejected(&self) -> MoveTracker {
        self.rejected
    }

    /// Executed moves per move type.
    pub fn get_attempted(&self) -> MoveTracker {
        self.attempted
    }

    /// Executed moves that succeeded.
    pub fn get_succeeded(&self) -> MoveTracker {
        self.succeeded
    }

    /// Executed moves that failed.
    pub fn get_failed(&self) -> MoveTracker {
        self.failed
    }

    fn master_seed(&self) -> u64 {
        self.config.seed_policy.master_seed
    }

    /// Bootstraps the chain with one move of each ergodic type.
    ///
    /// Each bootstrap move counts as proposed and accepted. The executed
    /// command is handed to [`Metropolis::fold_bootstrap`].
    pub fn initialize(&mut self, manifold: &Manifold) -> Result<MoveCommand, CdtError> {
        let mut command =
            MoveCommand::with_seed(manifold, determinism::command_seed(self.master_seed(), 0));
        for move_type in MoveType::ERGODIC {
            command.enqueue(move_type);
            self.trial.record(move_type);
            self.accepted.record(move_type);
        }
        command.execute();
        self.fold_bootstrap(command)
    }

    /// Folds an executed bootstrap command into the execution ledgers.
    ///
    /// Fails with `initialization-failed` when no bootstrap move succeeded or
    /// the resulting manifold is invalid. Nothing is folded in that case and
    /// the caller should continue from the un-bootstrapped manifold.
    pub fn fold_bootstrap(&mut self, command: MoveCommand) -> Result<MoveCommand, CdtError> {
        let succeeded = command.get_succeeded().total();
        if succeeded == 0 {
            return Err(CdtError::Triangulation(
                ErrorInfo::new("initialization-failed", "no bootstrap move succeeded")
                    .with_context("attempted", command.get_attempted().total().to_string()),
            ));
        }
        if let Err(err) = command.get_manifold().get_triangulation().validate() {
            return Err(CdtError::Triangulation(
                ErrorInfo::new("initialization-failed", "bootstrap moves produced an invalid manifold")
                    .with_context("cause", err.code()),
            ));
        }

        self.attempted += command.get_attempted();
        self.succeeded += command.get_succeeded();
        self.failed += command.get_failed();
        self.geometry = *command.get_manifold().geometry();
        log::info!(
            "bootstrap: {succeeded} of {} moves succeeded, N3 = {}",
            command.get_attempted().total(),
            self.geometry.n3
        );
        Ok(command)
    }

    /// Proposal ratio `attempted[m] / total attempted`.
    ///
    /// Falls back to the uniform 1/5 before any move has been executed.
    pub fn calculate_a1(&self, move_type: MoveType) -> Result<f64, CdtError> {
        let total = self.attempted.total();
        if total == 0 {
            return Ok(1.0 / MoveType::ERGODIC.len() as f64);
        }
        let ratio = Fixed::ratio(self.attempted[move_type], total, self.config.precision_bits)?;
        Ok(ratio.to_f64())
    }

    /// Action ratio `min(1, e^(S(current) - S(candidate)))`.
    pub fn calculate_a2(&self, move_type: MoveType) -> Result<f64, CdtError> {
        if matches!(move_type, MoveType::FourFour | MoveType::Null) {
            return Ok(1.0);
        }
        let delta = self.action.delta(&self.geometry, move_type);
        if !delta.is_negative() {
            return Ok(1.0);
        }
        Ok(delta.exp()?.to_f64())
    }

    /// Decides one proposal of `move_type`, updating the trial ledgers.
    pub fn try_move(&mut self, move_type: MoveType) -> Result<bool, CdtError> {
        self.trial.record(move_type);
        let a1 = self.calculate_a1(move_type)?;
        let a2 = self.calculate_a2(move_type)?;
        let draw = self.rng.probability();
        let accepted = draw <= a1 * a2;
        if accepted {
            self.accepted.record(move_type);
        } else {
            self.rejected.record(move_type);
        }
        log::trace!("{move_type}: A1 = {a1:.6}, A2 = {a2:.6}, u = {draw:.6}, accepted = {accepted}");
        Ok(accepted)
    }

    /// Runs all passes starting from `manifold` and returns the final manifold.
    pub fn run(&mut self, manifold: &Manifold) -> Result<Manifold, CdtError> {
        log::info!(
            "starting {} passes: alpha = {}, k = {}, lambda = {}, checkpoint every {}",
            self.config.passes,
            self.config.alpha,
            self.config.k,
            self.config.lambda,
            self.config.checkpoint
        );
        let bootstrap = self.initialize(manifold);
        self.run_from(manifold, bootstrap)
    }

    /// Runs all passes after a bootstrap attempt.
    ///
    /// A failed bootstrap is logged and the passes start from `manifold`
    /// with its own geometry.
    pub fn run_from(
        &mut self,
        manifold: &Manifold,
        bootstrap: Result<MoveCommand, CdtError>,
    ) -> Result<Manifold, CdtError> {
        let mut current = match bootstrap {
            Ok(command) => command.into_manifold(),
            Err(err) => {
                log::warn!("bootstrap failed, continuing from the original manifold: {err}");
                self.geometry = *manifold.geometry();
                manifold.clone()
            }
        };

        for pass in 1..=self.config.passes {
            current = self.run_pass(&current, pass)?;
            if self.config.checkpoint > 0 && pass % self.config.checkpoint == 0 {
                log::info!("pass {pass} of {}", self.config.passes);
                self.print_results();
                self.write_checkpoint(&current, pass);
            }
        }

        log::info!("run complete");
        self.print_results();
        self.write_outputs(&current);
        Ok(current)
    }

    fn run_pass(&mut self, manifold: &Manifold, pass: usize) -> Result<Manifold, CdtError> {
        let proposals = self.geometry.n3;
        let mut command =
            MoveCommand::with_seed(manifold, determinism::command_seed(self.master_seed(), pass));
        let mut queued = 0u64;
        for _ in 0..proposals {
            let move_type = MoveType::ERGODIC[self.rng.index(MoveType::ERGODIC.len())];
            if self.try_move(move_type)? {
                command.enqueue(move_type);
                queued += 1;
            }
        }
        command.execute();

        let succeeded = command.get_succeeded();
        let failed = command.get_failed();
        self.attempted += command.get_attempted();
        self.succeeded += succeeded;
        self.failed += failed;

        let result = command.into_manifold();
        self.geometry = *result.geometry();
        self.recorder.push_sample(PassSample {
            pass,
            geometry: self.geometry,
            proposed: proposals as u64,
            accepted: queued,
            succeeded: succeeded.total(),
            failed: failed.total(),
            action: self.action.coefficients().evaluate(&self.geometry),
            triangulation_hash: canonical_hash(result.get_triangulation()),
        });
        log::debug!(
            "pass {pass}: {queued} of {proposals} proposals accepted, {} succeeded, N3 = {}",
            succeeded.total(),
            self.geometry.n3
        );
        Ok(result)
    }

    fn write_checkpoint(&mut self, manifold: &Manifold, pass: usize) {
        let Some(run_directory) = &self.config.output.run_directory else {
            return;
        };
        let directory = run_directory.join(&self.config.output.checkpoint_dir);
        let metadata = CheckpointMetadata::new(
            manifold,
            self.config.initial_radius,
            self.config.foliation_spacing,
            pass,
        );
        match checkpoint::write_file(&directory, manifold, metadata, self.master_seed()) {
            Ok(path) => self.checkpoints.push(path),
            Err(err) => log::warn!("checkpoint for pass {pass} not written: {err}"),
        }
    }

    fn write_outputs(&mut self, manifold: &Manifold) {
        let Some(run_directory) = self.config.output.run_directory.clone() else {
            return;
        };
        if let Err(err) = fs::create_dir_all(&run_directory) {
            log::warn!("run directory {} not created: {err}", run_directory.display());
            return;
        }

        let metrics_path = run_directory.join(&self.config.output.metrics_file);
        match self.recorder.write_csv(&metrics_path) {
            Ok(()) => self.metrics_path = Some(metrics_path),
            Err(err) => log::warn!("metrics not written to {}: {err}", metrics_path.display()),
        }

        let manifest = RunManifest {
            config: self.config.clone(),
            master_seed: self.master_seed(),
            seed_label: self.config.seed_policy.label.clone(),
            triangulation_hash: canonical_hash(manifold.get_triangulation()),
            final_geometry: self.geometry,
            metrics_file: self
                .metrics_path
                .as_ref()
                .and_then(|path| path.strip_prefix(&run_directory).ok())
                .map(|rel| rel.to_path_buf()),
            checkpoints: self
                .checkpoints
                .iter()
                .filter_map(|path| path.strip_prefix(&run_directory).ok())
                .map(|rel| rel.to_path_buf())
                .collect(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let manifest_path = run_directory.join(&self.config.output.manifest_file);
        match manifest.write(&manifest_path) {
            Ok(()) => self.manifest_path = Some(manifest_path),
            Err(err) => log::warn!("manifest not written: {err}"),
        }
    }

    /// Logs the running ledgers and the current geometry.
    pub fn print_results(&self) {
        log::info!(
            "geometry: N3 = {} (N3_31 = {}, N3_22 = {}, N3_13 = {}), N1_TL = {}, N1_SL = {}, N0 = {}",
            self.geometry.n3,
            self.geometry.n3_31,
            self.geometry.n3_22,
            self.geometry.n3_13,
            self.geometry.n1_tl,
            self.geometry.n1_sl,
            self.geometry.n0
        );
        for move_type in MoveType::ERGODIC {
            log::info!(
                "{move_type}: trial {} accepted {} rejected {} attempted {} succeeded {} failed {}",
                self.trial[move_type],
                self.accepted[move_type],
                self.rejected[move_type],
                self.attempted[move_type],
                self.succeeded[move_type],
                self.failed[move_type]
            );
        }
        log::info!(
            "totals: trial {} accepted {} rejected {} attempted {} succeeded {} failed {}",
            self.trial.total(),
            self.accepted.total(),
            self.rejected.total(),
            self.attempted.total(),
            self.succeeded.total(),
            self.failed.total()
        );
    }

    /// Snapshot of the run statistics.
    pub fn summary(&self) -> RunSummary {
        let acceptance_rates = MoveType::ERGODIC
            .iter()
            .filter(|move_type| self.trial[**move_type] > 0)
            .map(|move_type| {
                let rate = self.accepted[*move_type] as f64 / self.trial[*move_type] as f64;
                (move_type.as_str().to_string(), rate)
            })
            .collect();
        RunSummary {
            trial: self.trial,
            accepted: self.accepted,
            rejected: self.rejected,
            attempted: self.attempted,
            succeeded: self.succeeded,
            failed: self.failed,
            acceptance_rates,
            final_geometry: self.geometry,
            unique_states: self.recorder.unique_states(),
            samples: self.recorder.samples().to_vec(),
            checkpoints: self.checkpoints.clone(),
            metrics_path: self.metrics_path.clone(),
            manifest_path: self.manifest_path.clone(),
        }
    }
}

/// Builds the configured starting manifold and runs the engine on it.
pub fn simulate(config: &MetropolisConfig) -> Result<(Manifold, RunSummary), CdtError> {
    config.validate()?;
    let manifold = Manifold::new(config.manifold.simplices, config.manifold.timeslices)?;
    manifold.print_details();
    let mut engine = Metropolis::new(config.clone())?;
    let result = engine.run(&manifold)?;
    result.print_details();
    result.print_volume_per_timeslice();
    Ok((result, engine.summary()))
}
