use std::collections::BTreeMap;

use cdt_core::VertexId;

use crate::simplex::{edges_of, facets_of, Cell, Edge, Facet};
use crate::triangulation::FoliatedTriangulation;

/// Cell incidence for every facet, edge and vertex of a triangulation.
///
/// Built once per move attempt; it is a snapshot and is not updated when the
/// triangulation changes.
#[derive(Debug, Clone, Default)]
pub struct Incidence {
    facets: BTreeMap<Facet, Vec<Cell>>,
    edges: BTreeMap<Edge, Vec<Cell>>,
    vertices: BTreeMap<VertexId, Vec<Cell>>,
}

impl Incidence {
    /// Indexes the cells of the triangulation.
    pub fn build(triangulation: &FoliatedTriangulation) -> Self {
        let mut incidence = Self::default();
        for cell in triangulation.cells() {
            for facet in facets_of(cell) {
                incidence.facets.entry(facet).or_default().push(*cell);
            }
            for edge in edges_of(cell) {
                incidence.edges.entry(edge).or_default().push(*cell);
            }
            for vertex in cell {
                incidence.vertices.entry(*vertex).or_default().push(*cell);
            }
        }
        incidence
    }

    /// Cells containing the facet.
    pub fn cells_of_facet(&self, facet: &Facet) -> &[Cell] {
        self.facets.get(facet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cells containing the edge.
    pub fn cells_of_edge(&self, edge: &Edge) -> &[Cell] {
        self.edges.get(edge).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cells containing the vertex.
    pub fn cells_of_vertex(&self, vertex: VertexId) -> &[Cell] {
        self.vertices
            .get(&vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns whether some cell contains the facet.
    pub fn has_facet(&self, facet: &Facet) -> bool {
        self.facets.contains_key(facet)
    }

    /// Returns whether some cell contains the edge.
    pub fn has_edge(&self, edge: &Edge) -> bool {
        self.edges.contains_key(edge)
    }

    /// Iterates over facets with their incident cells.
    pub fn facets(&self) -> impl ExactSizeIterator<Item = (&Facet, &[Cell])> + '_ {
        self.facets.iter().map(|(facet, cells)| (facet, cells.as_slice()))
    }

    /// Iterates over edges with their incident cells.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = (&Edge, &[Cell])> + '_ {
        self.edges.iter().map(|(edge, cells)| (edge, cells.as_slice()))
    }

    /// Iterates over vertices with their incident cells.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = (VertexId, &[Cell])> + '_ {
        self.vertices
            .iter()
            .map(|(vertex, cells)| (*vertex, cells.as_slice()))
    }
}
