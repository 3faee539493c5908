use std::collections::{BTreeMap, BTreeSet};

use cdt_core::errors::{CdtError, ErrorInfo};
use cdt_core::{CellType, EdgeType, Triangulation, VertexId};

use crate::generators;
use crate::simplex::{
    classify_cell_times, classify_edge_times, edges_of, facets_of, sorted_cell, Cell, Edge, Facet,
};
use crate::validation;

/// Minimum number of timeslices for which periodic adjacency is unambiguous.
pub const MIN_TIMESLICES: u32 = 3;

/// Combinatorial foliated triangulation of a closed 3-manifold with periodic time.
///
/// Vertices carry a timeslice label; cells are stored as sorted vertex quadruples.
/// Edges and facets are derived from the cells on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoliatedTriangulation {
    timeslices: u32,
    vertices: BTreeMap<VertexId, u32>,
    cells: BTreeSet<Cell>,
    next_vertex: u64,
}

impl FoliatedTriangulation {
    /// Builds an S²×S¹ triangulation close to the requested size.
    pub fn new(desired_simplices: usize, desired_timeslices: usize) -> Result<Self, CdtError> {
        generators::foliated_sphere(desired_simplices, desired_timeslices)
    }

    /// Assembles a triangulation from explicit vertices and cells and validates it.
    pub fn from_parts(
        timeslices: u32,
        vertices: impl IntoIterator<Item = (VertexId, u32)>,
        cells: impl IntoIterator<Item = [VertexId; 4]>,
    ) -> Result<Self, CdtError> {
        let vertices: BTreeMap<VertexId, u32> = vertices.into_iter().collect();
        let cells: BTreeSet<Cell> = cells.into_iter().map(sorted_cell).collect();
        let next_vertex = vertices
            .keys()
            .next_back()
            .map(|id| id.as_raw() + 1)
            .unwrap_or(0);
        let triangulation = Self {
            timeslices,
            vertices,
            cells,
            next_vertex,
        };
        triangulation.validate()?;
        Ok(triangulation)
    }

    /// Number of timeslices in the foliation.
    pub fn timeslices(&self) -> u32 {
        self.timeslices
    }

    /// Timeslice label of a vertex.
    pub fn time_of(&self, vertex: VertexId) -> Option<u32> {
        self.vertices.get(&vertex).copied()
    }

    /// Iterates over vertices and their timeslice labels in id order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = (VertexId, u32)> + '_ {
        self.vertices.iter().map(|(id, time)| (*id, *time))
    }

    /// Iterates over cells in canonical order.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Returns whether the cell is present.
    pub fn contains_cell(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Returns whether the vertex is present.
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.contains_key(&vertex)
    }

    /// Classifies a cell, or `None` if it does not span two adjacent slices.
    pub fn cell_type(&self, cell: &Cell) -> Option<CellType> {
        let [a, b, c, d] = *cell;
        let times = [
            self.time_of(a)?,
            self.time_of(b)?,
            self.time_of(c)?,
            self.time_of(d)?,
        ];
        classify_cell_times(times, self.timeslices)
    }

    /// Classifies an edge, or `None` if its endpoints are not on equal or adjacent slices.
    pub fn edge_type(&self, edge: &Edge) -> Option<EdgeType> {
        let [a, b] = *edge;
        classify_edge_times(self.time_of(a)?, self.time_of(b)?, self.timeslices)
    }

    /// All edges of the triangulation.
    pub fn edges(&self) -> BTreeSet<Edge> {
        self.cells.iter().flat_map(edges_of).collect()
    }

    /// All triangles of the triangulation.
    pub fn facets(&self) -> BTreeSet<Facet> {
        self.cells.iter().flat_map(facets_of).collect()
    }

    /// Number of spacelike triangles on every timeslice.
    pub fn volume_per_timeslice(&self) -> BTreeMap<u32, usize> {
        let mut volumes: BTreeMap<u32, usize> = (0..self.timeslices).map(|t| (t, 0)).collect();
        for facet in self.facets() {
            let times: Vec<u32> = facet.iter().filter_map(|v| self.time_of(*v)).collect();
            if let [a, b, c] = times[..] {
                if a == b && b == c {
                    *volumes.entry(a).or_insert(0) += 1;
                }
            }
        }
        volumes
    }

    /// Checks the triangulation is a valid foliated closed 3-manifold.
    pub fn validate(&self) -> Result<(), CdtError> {
        validation::validate(self)
    }

    /// Identifier the next inserted vertex will receive.
    pub fn next_vertex_id(&self) -> VertexId {
        VertexId::from_raw(self.next_vertex)
    }

    pub(crate) fn with_next_vertex(mut self, next_vertex: u64) -> Self {
        self.next_vertex = self.next_vertex.max(next_vertex);
        self
    }

    pub(crate) fn insert_vertex(&mut self, vertex: VertexId, time: u32) -> Result<(), CdtError> {
        if time >= self.timeslices {
            return Err(CdtError::Triangulation(
                ErrorInfo::new("vertex-time-out-of-range", "timeslice label exceeds foliation")
                    .with_context("vertex", vertex.as_raw().to_string())
                    .with_context("time", time.to_string()),
            ));
        }
        if self.vertices.contains_key(&vertex) {
            return Err(CdtError::Triangulation(
                ErrorInfo::new("duplicate-vertex", "vertex already present")
                    .with_context("vertex", vertex.as_raw().to_string()),
            ));
        }
        self.vertices.insert(vertex, time);
        self.next_vertex = self.next_vertex.max(vertex.as_raw() + 1);
        Ok(())
    }

    pub(crate) fn remove_vertex(&mut self, vertex: VertexId) -> bool {
        self.vertices.remove(&vertex).is_some()
    }

    pub(crate) fn insert_cell(&mut self, cell: Cell) -> bool {
        self.cells.insert(sorted_cell(cell))
    }

    pub(crate) fn remove_cell(&mut self, cell: &Cell) -> bool {
        self.cells.remove(cell)
    }

    fn count_edges(&self, edge_type: EdgeType) -> usize {
        self.edges()
            .iter()
            .filter(|edge| self.edge_type(edge) == Some(edge_type))
            .count()
    }
}

impl Triangulation for FoliatedTriangulation {
    fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn number_of_edges_of_type(&self, edge_type: EdgeType) -> usize {
        self.count_edges(edge_type)
    }

    fn number_of_edges(&self) -> usize {
        self.edges().len()
    }

    fn number_of_facets(&self) -> usize {
        self.facets().len()
    }

    fn number_of_cells_of_type(&self, cell_type: CellType) -> usize {
        self.cells
            .iter()
            .filter(|cell| self.cell_type(cell) == Some(cell_type))
            .count()
    }

    fn number_of_finite_cells(&self) -> usize {
        self.cells.len()
    }

    fn max_time(&self) -> u32 {
        self.vertices.values().copied().max().unwrap_or(0)
    }

    fn min_time(&self) -> u32 {
        self.vertices.values().copied().min().unwrap_or(0)
    }

    fn is_correct(&self) -> bool {
        self.validate().is_ok()
    }
}
