#![deny(missing_docs)]

//! Core traits and data types shared by the CDT triangulation and sampler crates.

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod provenance;
pub mod rng;
mod types;

pub use errors::{CdtError, ErrorInfo};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
pub use types::Couplings;

/// Default bit width of the extended precision arithmetic.
pub const DEFAULT_PRECISION_BITS: u32 = 256;

/// Radius of the innermost timeslice recorded in checkpoint metadata.
pub const INITIAL_RADIUS: f64 = 1.0;

/// Radial distance between successive timeslices recorded in checkpoint metadata.
pub const FOLIATION_SPACING: f64 = 1.0;

/// Identifier for a vertex within a [`Triangulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(u64);

impl VertexId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// The ergodic moves together with the null move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveType {
    /// Leaves the triangulation untouched.
    Null,
    /// Replaces two cells sharing a timelike facet by three around a new timelike edge.
    TwoThree,
    /// Inverse of [`MoveType::TwoThree`].
    ThreeTwo,
    /// Inserts a vertex into a spacelike facet, turning two cells into six.
    TwoSix,
    /// Inverse of [`MoveType::TwoSix`].
    SixTwo,
    /// Flips a spacelike edge shared by four cells.
    FourFour,
}

impl MoveType {
    /// Every move type in ledger order.
    pub const ALL: [MoveType; 6] = [
        MoveType::Null,
        MoveType::TwoThree,
        MoveType::ThreeTwo,
        MoveType::TwoSix,
        MoveType::SixTwo,
        MoveType::FourFour,
    ];

    /// The five topology changing moves, in bootstrap order.
    pub const ERGODIC: [MoveType; 5] = [
        MoveType::TwoThree,
        MoveType::ThreeTwo,
        MoveType::TwoSix,
        MoveType::SixTwo,
        MoveType::FourFour,
    ];

    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveType::Null => "null",
            MoveType::TwoThree => "(2,3)",
            MoveType::ThreeTwo => "(3,2)",
            MoveType::TwoSix => "(2,6)",
            MoveType::SixTwo => "(6,2)",
            MoveType::FourFour => "(4,4)",
        }
    }

    /// Position of the move type inside [`MoveType::ALL`].
    pub fn index(&self) -> usize {
        match self {
            MoveType::Null => 0,
            MoveType::TwoThree => 1,
            MoveType::ThreeTwo => 2,
            MoveType::TwoSix => 3,
            MoveType::SixTwo => 4,
            MoveType::FourFour => 5,
        }
    }
}

impl std::fmt::Display for MoveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a 3-simplex by how its vertices split across two adjacent timeslices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Three vertices on the lower slice, one on the upper.
    ThreeOne,
    /// Two vertices on each slice.
    TwoTwo,
    /// One vertex on the lower slice, three on the upper.
    OneThree,
}

/// Classification of an edge relative to the foliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// Connects vertices on adjacent timeslices.
    Timelike,
    /// Connects vertices on the same timeslice.
    Spacelike,
}

/// Structural contract the sampler consumes from a foliated triangulation.
pub trait Triangulation: Clone {
    /// Number of vertices.
    fn number_of_vertices(&self) -> usize;

    /// Number of edges of the given type.
    fn number_of_edges_of_type(&self, edge_type: EdgeType) -> usize;

    /// Total number of edges.
    fn number_of_edges(&self) -> usize {
        self.number_of_edges_of_type(EdgeType::Timelike)
            + self.number_of_edges_of_type(EdgeType::Spacelike)
    }

    /// Number of triangles.
    fn number_of_facets(&self) -> usize;

    /// Number of 3-simplices of the given type.
    fn number_of_cells_of_type(&self, cell_type: CellType) -> usize;

    /// Total number of 3-simplices.
    fn number_of_finite_cells(&self) -> usize;

    /// Largest timeslice label in use.
    fn max_time(&self) -> u32;

    /// Smallest timeslice label in use.
    fn min_time(&self) -> u32;

    /// Returns true when the triangulation is a valid foliated 3-manifold.
    fn is_correct(&self) -> bool;
}
