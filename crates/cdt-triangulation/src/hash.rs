use sha2::{Digest, Sha256};

use crate::triangulation::FoliatedTriangulation;

/// Computes the structural hash of a triangulation.
///
/// The hash covers the foliation length, every vertex with its timeslice and
/// every cell, all in canonical order. It depends on vertex labels.
pub fn canonical_hash(triangulation: &FoliatedTriangulation) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"foliated-s2xs1");
    hasher.update(triangulation.timeslices().to_le_bytes());

    hasher.update((triangulation.vertices().len() as u64).to_le_bytes());
    for (vertex, time) in triangulation.vertices() {
        hasher.update(vertex.as_raw().to_le_bytes());
        hasher.update(time.to_le_bytes());
    }

    hasher.update((triangulation.cells().len() as u64).to_le_bytes());
    for cell in triangulation.cells() {
        for vertex in cell {
            hasher.update(vertex.as_raw().to_le_bytes());
        }
    }

    format!("{:x}", hasher.finalize())
}
