use serde::{Deserialize, Serialize};

/// Coupling constants of the discretised Einstein-Hilbert action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Couplings {
    /// Squared ratio of timelike to spacelike edge length.
    pub alpha: f64,
    /// Normalised inverse Newton constant.
    pub k: f64,
    /// Normalised cosmological constant.
    pub lambda: f64,
}

impl Couplings {
    /// Creates a coupling triple.
    pub const fn new(alpha: f64, k: f64, lambda: f64) -> Self {
        Self { alpha, k, lambda }
    }

    /// Returns true when every coupling is finite and `alpha` is positive.
    pub fn is_physical(&self) -> bool {
        self.alpha.is_finite() && self.k.is_finite() && self.lambda.is_finite() && self.alpha > 0.0
    }
}

impl Default for Couplings {
    fn default() -> Self {
        Self::new(0.6, 1.1, 0.1)
    }
}
