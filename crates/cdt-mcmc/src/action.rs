use std::f64::consts::PI;

use cdt_core::errors::CdtError;
use cdt_core::{Couplings, MoveType};
use cdt_triangulation::Geometry;

use crate::precision::Fixed;

/// Change a move makes to the counts the action depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDelta {
    /// Change in timelike edges.
    pub n1_tl: i64,
    /// Change in (3,1) plus (1,3) simplices.
    pub n3_31_13: i64,
    /// Change in (2,2) simplices.
    pub n3_22: i64,
}

impl ActionDelta {
    /// Count changes used when evaluating the candidate action of a move.
    ///
    /// (6,2) is weighted with two fewer timelike edges and four fewer (2,2)
    /// simplices, leaving the mixed term alone. This is not the count change
    /// the move makes to the triangulation, which is the inverse of (2,6).
    pub fn for_move(move_type: MoveType) -> Self {
        let (n1_tl, n3_31_13, n3_22) = match move_type {
            MoveType::Null | MoveType::FourFour => (0, 0, 0),
            MoveType::TwoThree => (1, 0, 1),
            MoveType::ThreeTwo => (-1, 0, -1),
            MoveType::TwoSix => (2, 4, 0),
            MoveType::SixTwo => (-2, 0, -4),
        };
        Self {
            n1_tl,
            n3_31_13,
            n3_22,
        }
    }
}

/// Per-count coefficients of the bulk action in `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionCoefficients {
    /// Coefficient of N1_TL.
    pub timelike: f64,
    /// Coefficient of N3_31 + N3_13.
    pub mixed: f64,
    /// Coefficient of N3_22.
    pub two_two: f64,
}

impl ActionCoefficients {
    /// Evaluates the coefficients of the generalised-alpha Regge action.
    pub fn new(couplings: &Couplings) -> Self {
        let Couplings { alpha, k, lambda } = *couplings;
        let sqrt_alpha = alpha.sqrt();
        let four_alpha_one = 4.0 * alpha + 1.0;

        let timelike = 2.0 * PI * k * sqrt_alpha;
        let mixed = -3.0 * k * (1.0 / (3f64.sqrt() * four_alpha_one.sqrt())).asinh()
            - 3.0 * k * sqrt_alpha * ((2.0 * alpha + 1.0) / four_alpha_one).acos()
            - lambda / 12.0 * (3.0 * alpha + 1.0).sqrt();
        let two_two = 2.0 * k * (2.0 * 2f64.sqrt() * (2.0 * alpha + 1.0).sqrt() / four_alpha_one).asinh()
            - 4.0 * k * sqrt_alpha * (-1.0 / four_alpha_one).acos()
            - lambda / 12.0 * (4.0 * alpha + 2.0).sqrt();
        Self {
            timelike,
            mixed,
            two_two,
        }
    }

    /// The action of a geometry in plain `f64`.
    pub fn evaluate(&self, geometry: &Geometry) -> f64 {
        self.timelike * geometry.n1_tl as f64
            + self.mixed * geometry.n3_31_13() as f64
            + self.two_two * geometry.n3_22 as f64
    }
}

/// Bulk action with coefficients lifted into extended precision.
///
/// Coefficients are computed once in `f64` and lifted exactly; evaluating
/// the action and differences of actions is then exact.
#[derive(Debug, Clone)]
pub struct BulkAction {
    coefficients: ActionCoefficients,
    timelike: Fixed,
    mixed: Fixed,
    two_two: Fixed,
    bits: u32,
}

impl BulkAction {
    /// Prepares the action for `couplings` at `bits` fractional bits.
    pub fn new(couplings: &Couplings, bits: u32) -> Result<Self, CdtError> {
        let coefficients = ActionCoefficients::new(couplings);
        Ok(Self {
            coefficients,
            timelike: Fixed::from_f64(coefficients.timelike, bits)?,
            mixed: Fixed::from_f64(coefficients.mixed, bits)?,
            two_two: Fixed::from_f64(coefficients.two_two, bits)?,
            bits,
        })
    }

    /// The `f64` coefficients.
    pub fn coefficients(&self) -> &ActionCoefficients {
        &self.coefficients
    }

    /// Fractional bits of the extended precision values.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Exact action for the given counts.
    pub fn evaluate(&self, n1_tl: i64, n3_31_13: i64, n3_22: i64) -> Fixed {
        self.timelike.mul_int(n1_tl) + self.mixed.mul_int(n3_31_13) + self.two_two.mul_int(n3_22)
    }

    /// `S(current) - S(candidate)` for a move applied to `geometry`.
    pub fn delta(&self, geometry: &Geometry, move_type: MoveType) -> Fixed {
        let n1_tl = geometry.n1_tl as i64;
        let n3_31_13 = geometry.n3_31_13() as i64;
        let n3_22 = geometry.n3_22 as i64;
        let change = ActionDelta::for_move(move_type);
        let current = self.evaluate(n1_tl, n3_31_13, n3_22);
        let candidate = self.evaluate(
            n1_tl + change.n1_tl,
            n3_31_13 + change.n3_31_13,
            n3_22 + change.n3_22,
        );
        current - candidate
    }
}
