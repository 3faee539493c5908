use cdt_core::{CellType, EdgeType, Triangulation};
use serde::{Deserialize, Serialize};

/// Simplex counts of a triangulation at one point in time.
///
/// `n3 = n3_31 + n3_22 + n3_13` and `n1 = n1_tl + n1_sl` hold for every
/// snapshot taken from a triangulation. The default snapshot is all zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geometry {
    /// Number of 3-simplices.
    pub n3: usize,
    /// Number of (3,1) simplices.
    pub n3_31: usize,
    /// Number of (2,2) simplices.
    pub n3_22: usize,
    /// Number of (1,3) simplices.
    pub n3_13: usize,
    /// Number of triangles.
    pub n2: usize,
    /// Number of edges.
    pub n1: usize,
    /// Number of timelike edges.
    pub n1_tl: usize,
    /// Number of spacelike edges.
    pub n1_sl: usize,
    /// Number of vertices.
    pub n0: usize,
}

impl Geometry {
    /// Reads the counts from a triangulation.
    pub fn from_triangulation<T: Triangulation>(triangulation: &T) -> Self {
        let n1_tl = triangulation.number_of_edges_of_type(EdgeType::Timelike);
        let n1_sl = triangulation.number_of_edges_of_type(EdgeType::Spacelike);
        Self {
            n3: triangulation.number_of_finite_cells(),
            n3_31: triangulation.number_of_cells_of_type(CellType::ThreeOne),
            n3_22: triangulation.number_of_cells_of_type(CellType::TwoTwo),
            n3_13: triangulation.number_of_cells_of_type(CellType::OneThree),
            n2: triangulation.number_of_facets(),
            n1: n1_tl + n1_sl,
            n1_tl,
            n1_sl,
            n0: triangulation.number_of_vertices(),
        }
    }

    /// Combined number of (3,1) and (1,3) simplices.
    pub fn n3_31_13(&self) -> usize {
        self.n3_31 + self.n3_13
    }
}
