#![deny(missing_docs)]

//! Combinatorial foliated triangulations implementing the `cdt-core` contracts.
//!
//! Provides the S²×S¹ generator, structural validation, the ergodic rewrite
//! primitives, and the [`Manifold`] handle pairing a triangulation with its
//! [`Geometry`] snapshot.

mod ergodic;
mod generators;
mod geometry;
mod hash;
mod incidence;
mod manifold;
mod serialization;
mod simplex;
mod triangulation;
mod validation;

pub use ergodic::{
    apply_rewrite, candidates_23, candidates_26, candidates_32, candidates_44, candidates_62,
    plan_23, plan_26, plan_32, plan_44, plan_62, Rewrite,
};
pub use generators::foliated_sphere;
pub use geometry::Geometry;
pub use hash::canonical_hash;
pub use incidence::Incidence;
pub use manifold::Manifold;
pub use simplex::{
    classify_cell_times, classify_edge_times, edges_of, facets_of, sorted_cell, sorted_edge,
    sorted_facet, Cell, Edge, Facet,
};
pub use triangulation::{FoliatedTriangulation, MIN_TIMESLICES};
pub use validation::validate;

/// Re-export serialization helpers for downstream crates.
pub use serialization::{
    triangulation_from_bytes, triangulation_from_json, triangulation_to_bytes,
    triangulation_to_json,
};
