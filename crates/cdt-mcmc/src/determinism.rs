use cdt_core::derive_substream_seed;

/// Substream of the master seed feeding move-type selection and acceptance draws.
const PROPOSAL_STREAM: u64 = 0;

/// Substream of the master seed from which per-pass command seeds are derived.
const COMMAND_STREAM: u64 = 1;

/// Seed of the engine's proposal stream.
pub fn proposal_seed(master_seed: u64) -> u64 {
    derive_substream_seed(master_seed, PROPOSAL_STREAM)
}

/// Seed of the site-selection stream of the command built for `pass`.
///
/// Pass 0 is the bootstrap command of [`crate::Metropolis::initialize`].
pub fn command_seed(master_seed: u64, pass: usize) -> u64 {
    let commands = derive_substream_seed(master_seed, COMMAND_STREAM);
    derive_substream_seed(commands, pass as u64)
}
