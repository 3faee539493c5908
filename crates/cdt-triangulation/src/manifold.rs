use cdt_core::errors::CdtError;
use cdt_core::Triangulation;

use crate::ergodic::{apply_rewrite, Rewrite};
use crate::geometry::Geometry;
use crate::triangulation::FoliatedTriangulation;

/// A triangulation together with its current [`Geometry`] snapshot.
///
/// Cloning deep-copies both, which is how move commands isolate their
/// working state from the caller's manifold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifold {
    triangulation: FoliatedTriangulation,
    geometry: Geometry,
}

impl Manifold {
    /// Builds a manifold with roughly the requested number of simplices and timeslices.
    pub fn new(desired_simplices: usize, desired_timeslices: usize) -> Result<Self, CdtError> {
        let triangulation = FoliatedTriangulation::new(desired_simplices, desired_timeslices)?;
        Ok(Self::from_triangulation(triangulation))
    }

    /// Wraps an existing triangulation and computes its geometry.
    pub fn from_triangulation(triangulation: FoliatedTriangulation) -> Self {
        let geometry = Geometry::from_triangulation(&triangulation);
        Self {
            triangulation,
            geometry,
        }
    }

    /// Recomputes the geometry snapshot from the triangulation.
    pub fn update(&mut self) {
        self.geometry = Geometry::from_triangulation(&self.triangulation);
    }

    /// Returns a new manifold with `rewrite` applied; `self` is left untouched.
    pub fn apply(&self, rewrite: &Rewrite) -> Result<Manifold, CdtError> {
        let mut triangulation = self.triangulation.clone();
        apply_rewrite(&mut triangulation, rewrite)?;
        Ok(Self::from_triangulation(triangulation))
    }

    /// The underlying triangulation.
    pub fn get_triangulation(&self) -> &FoliatedTriangulation {
        &self.triangulation
    }

    /// Consumes the manifold, returning its triangulation.
    pub fn into_triangulation(self) -> FoliatedTriangulation {
        self.triangulation
    }

    /// The current geometry snapshot.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of 3-simplices.
    pub fn n3(&self) -> usize {
        self.geometry.n3
    }

    /// Number of (3,1) simplices.
    pub fn n3_31(&self) -> usize {
        self.geometry.n3_31
    }

    /// Number of (2,2) simplices.
    pub fn n3_22(&self) -> usize {
        self.geometry.n3_22
    }

    /// Number of (1,3) simplices.
    pub fn n3_13(&self) -> usize {
        self.geometry.n3_13
    }

    /// Combined number of (3,1) and (1,3) simplices.
    pub fn n3_31_13(&self) -> usize {
        self.geometry.n3_31_13()
    }

    /// Number of triangles.
    pub fn n2(&self) -> usize {
        self.geometry.n2
    }

    /// Number of edges.
    pub fn n1(&self) -> usize {
        self.geometry.n1
    }

    /// Number of timelike edges.
    pub fn n1_tl(&self) -> usize {
        self.geometry.n1_tl
    }

    /// Number of spacelike edges.
    pub fn n1_sl(&self) -> usize {
        self.geometry.n1_sl
    }

    /// Number of vertices.
    pub fn n0(&self) -> usize {
        self.geometry.n0
    }

    /// Largest timeslice label in use.
    pub fn max_time(&self) -> u32 {
        self.triangulation.max_time()
    }

    /// Smallest timeslice label in use.
    pub fn min_time(&self) -> u32 {
        self.triangulation.min_time()
    }

    /// Returns true when the triangulation is valid and the snapshot is current.
    pub fn is_correct(&self) -> bool {
        self.triangulation.is_correct()
            && self.geometry == Geometry::from_triangulation(&self.triangulation)
    }

    /// Logs the simplex counts.
    pub fn print_details(&self) {
        let g = &self.geometry;
        log::info!(
            "manifold: N3={} (N3_31={}, N3_22={}, N3_13={}) N2={} N1={} (N1_TL={}, N1_SL={}) N0={}",
            g.n3,
            g.n3_31,
            g.n3_22,
            g.n3_13,
            g.n2,
            g.n1,
            g.n1_tl,
            g.n1_sl,
            g.n0
        );
    }

    /// Logs the number of spacelike triangles on each timeslice.
    pub fn print_volume_per_timeslice(&self) {
        for (time, volume) in self.triangulation.volume_per_timeslice() {
            log::info!("timeslice {time} has {volume} spacelike faces");
        }
    }
}
