use std::collections::VecDeque;

use cdt_core::errors::CdtError;
use cdt_core::{MoveType, RngHandle};
use cdt_triangulation::Manifold;

use crate::moves::MoveOperation;
use crate::tracker::MoveTracker;

/// Seed of the site-selection stream when none is supplied.
pub const DEFAULT_COMMAND_SEED: u64 = 0x00C0_44A4_D5EE_D000;

/// A move that failed during [`MoveCommand::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct MoveFailure {
    /// Move that was attempted.
    pub move_type: MoveType,
    /// Why it failed.
    pub error: CdtError,
}

/// Queue of moves applied in order to a private copy of a manifold.
///
/// The command deep-copies the manifold it is built from, so the caller's
/// manifold is never touched. A failing move leaves the copy as it was and
/// execution continues with the next queued move.
#[derive(Debug, Clone)]
pub struct MoveCommand {
    manifold: Manifold,
    queue: VecDeque<MoveOperation>,
    rng: RngHandle,
    attempted: MoveTracker,
    succeeded: MoveTracker,
    failed: MoveTracker,
    errors: Vec<MoveFailure>,
}

impl MoveCommand {
    /// Copies `manifold` into a new command with the default site-selection seed.
    pub fn new(manifold: &Manifold) -> Self {
        Self::with_seed(manifold, DEFAULT_COMMAND_SEED)
    }

    /// Copies `manifold` into a new command whose site selection is seeded with `seed`.
    pub fn with_seed(manifold: &Manifold, seed: u64) -> Self {
        Self {
            manifold: manifold.clone(),
            queue: VecDeque::new(),
            rng: RngHandle::from_seed(seed),
            attempted: MoveTracker::new(),
            succeeded: MoveTracker::new(),
            failed: MoveTracker::new(),
            errors: Vec::new(),
        }
    }

    /// Appends a move to the tail of the queue.
    pub fn enqueue(&mut self, operation: impl Into<MoveOperation>) {
        self.queue.push_back(operation.into());
    }

    /// Number of pending moves.
    pub fn size(&self) -> usize {
        self.queue.len()
    }

    /// Returns true when no moves are pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Applies every queued move in FIFO order.
    ///
    /// The ledgers and the error list describe this execution only.
    pub fn execute(&mut self) {
        self.attempted = MoveTracker::new();
        self.succeeded = MoveTracker::new();
        self.failed = MoveTracker::new();
        self.errors.clear();

        while let Some(operation) = self.queue.pop_front() {
            let move_type = operation.move_type();
            self.attempted.record(move_type);
            match operation.apply(&self.manifold, &mut self.rng) {
                Ok(result) => {
                    self.manifold = result;
                    self.succeeded.record(move_type);
                    log::debug!("{move_type} move succeeded, N3 = {}", self.manifold.n3());
                }
                Err(error) => {
                    self.failed.record(move_type);
                    log::debug!("{move_type} move failed: {error}");
                    self.errors.push(MoveFailure { move_type, error });
                }
            }
        }
    }

    /// The command's manifold.
    pub fn get_manifold(&self) -> &Manifold {
        &self.manifold
    }

    /// Mutable access to the command's manifold.
    pub fn get_results(&mut self) -> &mut Manifold {
        &mut self.manifold
    }

    /// Consumes the command, returning its manifold.
    pub fn into_manifold(self) -> Manifold {
        self.manifold
    }

    /// Moves attempted during the last execution.
    pub fn get_attempted(&self) -> MoveTracker {
        self.attempted
    }

    /// Moves that succeeded during the last execution.
    pub fn get_succeeded(&self) -> MoveTracker {
        self.succeeded
    }

    /// Moves that failed during the last execution.
    pub fn get_failed(&self) -> MoveTracker {
        self.failed
    }

    /// Failures of the last execution, in order.
    pub fn errors(&self) -> &[MoveFailure] {
        &self.errors
    }

    /// Logs the failures of the last execution.
    pub fn print_errors(&self) {
        if self.errors.is_empty() {
            log::info!("all moves succeeded");
            return;
        }
        for failure in &self.errors {
            log::warn!("{} move failed: {}", failure.move_type, failure.error);
        }
    }
}
