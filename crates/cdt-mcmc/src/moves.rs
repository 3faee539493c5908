use cdt_core::errors::{CdtError, ErrorInfo};
use cdt_core::{MoveType, RngHandle};
use cdt_triangulation::{
    candidates_23, candidates_26, candidates_32, candidates_44, candidates_62, plan_23, plan_26,
    plan_32, plan_44, plan_62, Geometry, Incidence, Manifold, Rewrite,
};
use rand::seq::SliceRandom;

/// A move tagged by its type, applied uniformly by [`crate::MoveCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOperation {
    move_type: MoveType,
}

impl MoveOperation {
    /// Wraps a move type.
    pub fn new(move_type: MoveType) -> Self {
        Self { move_type }
    }

    /// The move this operation performs.
    pub fn move_type(&self) -> MoveType {
        self.move_type
    }

    /// Applies the move to a copy of `manifold`; `rng` chooses among candidate sites.
    pub fn apply(&self, manifold: &Manifold, rng: &mut RngHandle) -> Result<Manifold, CdtError> {
        match self.move_type {
            MoveType::Null => null_move(manifold, rng),
            MoveType::TwoThree => do_23_move(manifold, rng),
            MoveType::ThreeTwo => do_32_move(manifold, rng),
            MoveType::TwoSix => do_26_move(manifold, rng),
            MoveType::SixTwo => do_62_move(manifold, rng),
            MoveType::FourFour => do_44_move(manifold, rng),
        }
    }
}

impl From<MoveType> for MoveOperation {
    fn from(move_type: MoveType) -> Self {
        Self::new(move_type)
    }
}

/// Returns an unchanged copy.
pub fn null_move(manifold: &Manifold, _rng: &mut RngHandle) -> Result<Manifold, CdtError> {
    Ok(manifold.clone())
}

/// Adds a timelike edge and a (2,2) simplex.
pub fn do_23_move(manifold: &Manifold, rng: &mut RngHandle) -> Result<Manifold, CdtError> {
    let triangulation = manifold.get_triangulation();
    let incidence = Incidence::build(triangulation);
    let mut sites = candidates_23(triangulation);
    sites.shuffle(rng);
    let rewrite = first_valid(
        MoveType::TwoThree,
        sites.len(),
        sites
            .iter()
            .map(|(cell, facet)| plan_23(triangulation, &incidence, cell, facet)),
    )?;
    manifold.apply(&rewrite)
}

/// Removes a timelike edge and a (2,2) simplex.
pub fn do_32_move(manifold: &Manifold, rng: &mut RngHandle) -> Result<Manifold, CdtError> {
    let triangulation = manifold.get_triangulation();
    let incidence = Incidence::build(triangulation);
    let mut sites = candidates_32(triangulation, &incidence);
    sites.shuffle(rng);
    let rewrite = first_valid(
        MoveType::ThreeTwo,
        sites.len(),
        sites
            .iter()
            .map(|edge| plan_32(triangulation, &incidence, edge)),
    )?;
    manifold.apply(&rewrite)
}

/// Inserts a vertex into a spacelike triangle, adding four mixed simplices.
pub fn do_26_move(manifold: &Manifold, rng: &mut RngHandle) -> Result<Manifold, CdtError> {
    let triangulation = manifold.get_triangulation();
    let incidence = Incidence::build(triangulation);
    let mut sites = candidates_26(triangulation, &incidence);
    sites.shuffle(rng);
    let rewrite = first_valid(
        MoveType::TwoSix,
        sites.len(),
        sites
            .iter()
            .map(|facet| plan_26(triangulation, &incidence, facet)),
    )?;
    manifold.apply(&rewrite)
}

/// Removes a vertex shared by six cells, the inverse of [`do_26_move`].
pub fn do_62_move(manifold: &Manifold, rng: &mut RngHandle) -> Result<Manifold, CdtError> {
    let triangulation = manifold.get_triangulation();
    let incidence = Incidence::build(triangulation);
    let mut sites = candidates_62(&incidence);
    sites.shuffle(rng);
    let rewrite = first_valid(
        MoveType::SixTwo,
        sites.len(),
        sites
            .iter()
            .map(|vertex| plan_62(triangulation, &incidence, *vertex)),
    )?;
    manifold.apply(&rewrite)
}

/// Flips a spacelike edge shared by four cells.
pub fn do_44_move(manifold: &Manifold, rng: &mut RngHandle) -> Result<Manifold, CdtError> {
    let triangulation = manifold.get_triangulation();
    let incidence = Incidence::build(triangulation);
    let mut sites = candidates_44(triangulation, &incidence);
    sites.shuffle(rng);
    let rewrite = first_valid(
        MoveType::FourFour,
        sites.len(),
        sites
            .iter()
            .map(|edge| plan_44(triangulation, &incidence, edge)),
    )?;
    manifold.apply(&rewrite)
}

fn first_valid(
    move_type: MoveType,
    candidates: usize,
    plans: impl Iterator<Item = Result<Rewrite, CdtError>>,
) -> Result<Rewrite, CdtError> {
    let mut last_rejection = None;
    for plan in plans {
        match plan {
            Ok(rewrite) => return Ok(rewrite),
            Err(err) => last_rejection = Some(err),
        }
    }
    let mut info = ErrorInfo::new("no-valid-site", format!("no valid site for a {move_type} move"))
        .with_context("move", move_type.as_str())
        .with_context("candidates", candidates.to_string());
    if let Some(err) = last_rejection {
        info = info.with_context("last-rejection", err.code());
    }
    Err(CdtError::Move(info))
}

/// Signed change of the counts between two geometry snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct CountChange {
    n3: i64,
    n3_31: i64,
    n3_22: i64,
    n3_13: i64,
    n1_tl: i64,
    n1_sl: i64,
    n0: i64,
}

impl CountChange {
    fn between(before: &Geometry, after: &Geometry) -> Self {
        let diff = |a: usize, b: usize| b as i64 - a as i64;
        Self {
            n3: diff(before.n3, after.n3),
            n3_31: diff(before.n3_31, after.n3_31),
            n3_22: diff(before.n3_22, after.n3_22),
            n3_13: diff(before.n3_13, after.n3_13),
            n1_tl: diff(before.n1_tl, after.n1_tl),
            n1_sl: diff(before.n1_sl, after.n1_sl),
            n0: diff(before.n0, after.n0),
        }
    }

    fn expected(move_type: MoveType) -> Self {
        let two_three = Self {
            n3: 1,
            n3_22: 1,
            n1_tl: 1,
            ..Self::default()
        };
        let two_six = Self {
            n3: 4,
            n3_31: 2,
            n3_13: 2,
            n1_tl: 2,
            n1_sl: 3,
            n0: 1,
            ..Self::default()
        };
        match move_type {
            MoveType::Null | MoveType::FourFour => Self::default(),
            MoveType::TwoThree => two_three,
            MoveType::ThreeTwo => two_three.inverse(),
            MoveType::TwoSix => two_six,
            MoveType::SixTwo => two_six.inverse(),
        }
    }

    fn inverse(self) -> Self {
        Self {
            n3: -self.n3,
            n3_31: -self.n3_31,
            n3_22: -self.n3_22,
            n3_13: -self.n3_13,
            n1_tl: -self.n1_tl,
            n1_sl: -self.n1_sl,
            n0: -self.n0,
        }
    }
}

/// Checks that `after` differs from `before` exactly as one `move_type` move would.
pub fn check_move(before: &Manifold, after: &Manifold, move_type: MoveType) -> bool {
    let change = CountChange::between(before.geometry(), after.geometry());
    let expected = CountChange::expected(move_type);
    if change != expected {
        log::debug!("{move_type} move changed counts by {change:?}, expected {expected:?}");
        return false;
    }
    after.is_correct()
}
