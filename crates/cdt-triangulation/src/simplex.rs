use cdt_core::{CellType, EdgeType, VertexId};

/// A 3-simplex stored as its four vertex ids in ascending order.
pub type Cell = [VertexId; 4];

/// A triangle stored as its three vertex ids in ascending order.
pub type Facet = [VertexId; 3];

/// An edge stored as its two vertex ids in ascending order.
pub type Edge = [VertexId; 2];

/// Sorts the vertices of a cell into canonical order.
pub fn sorted_cell(mut vertices: [VertexId; 4]) -> Cell {
    vertices.sort();
    vertices
}

/// Sorts the vertices of a facet into canonical order.
pub fn sorted_facet(mut vertices: [VertexId; 3]) -> Facet {
    vertices.sort();
    vertices
}

/// Builds the canonical edge between two vertices.
pub fn sorted_edge(a: VertexId, b: VertexId) -> Edge {
    if a <= b {
        [a, b]
    } else {
        [b, a]
    }
}

/// The four facets of a cell, facet `i` omitting vertex `i`.
pub fn facets_of(cell: &Cell) -> [Facet; 4] {
    let [a, b, c, d] = *cell;
    [[b, c, d], [a, c, d], [a, b, d], [a, b, c]]
}

/// The six edges of a cell.
pub fn edges_of(cell: &Cell) -> [Edge; 6] {
    let [a, b, c, d] = *cell;
    [[a, b], [a, c], [a, d], [b, c], [b, d], [c, d]]
}

/// The three edges of a facet.
pub fn edges_of_facet(facet: &Facet) -> [Edge; 3] {
    let [a, b, c] = *facet;
    [[a, b], [a, c], [b, c]]
}

/// The vertex of `cell` that does not lie on `facet`.
pub fn opposite(cell: &Cell, facet: &Facet) -> Option<VertexId> {
    let mut outside = cell.iter().copied().filter(|v| !facet.contains(v));
    match (outside.next(), outside.next()) {
        (Some(vertex), None) => Some(vertex),
        _ => None,
    }
}

/// Returns true when `upper` is the slice directly after `lower` in periodic time.
pub fn is_successor(lower: u32, upper: u32, timeslices: u32) -> bool {
    timeslices > 0 && (lower + 1) % timeslices == upper
}

/// The slice after `time` in periodic time.
pub fn next_slice(time: u32, timeslices: u32) -> u32 {
    (time + 1) % timeslices
}

/// The slice before `time` in periodic time.
pub fn previous_slice(time: u32, timeslices: u32) -> u32 {
    (time + timeslices - 1) % timeslices
}

/// Classifies a cell from the timeslice labels of its vertices.
///
/// Returns `None` unless the labels occupy exactly two adjacent slices.
pub fn classify_cell_times(times: [u32; 4], timeslices: u32) -> Option<CellType> {
    let first = times[0];
    let other = times.iter().copied().find(|&t| t != first)?;
    if times.iter().any(|&t| t != first && t != other) {
        return None;
    }
    let lower = if is_successor(first, other, timeslices) {
        first
    } else if is_successor(other, first, timeslices) {
        other
    } else {
        return None;
    };
    match times.iter().filter(|&&t| t == lower).count() {
        3 => Some(CellType::ThreeOne),
        2 => Some(CellType::TwoTwo),
        1 => Some(CellType::OneThree),
        _ => None,
    }
}

/// Classifies an edge from the timeslice labels of its endpoints.
pub fn classify_edge_times(a: u32, b: u32, timeslices: u32) -> Option<EdgeType> {
    if a == b {
        Some(EdgeType::Spacelike)
    } else if is_successor(a, b, timeslices) || is_successor(b, a, timeslices) {
        Some(EdgeType::Timelike)
    } else {
        None
    }
}

/// Renders vertex ids as `[a,b,c]` for error context.
pub(crate) fn describe(vertices: &[VertexId]) -> String {
    let ids: Vec<String> = vertices.iter().map(|v| v.as_raw().to_string()).collect();
    format!("[{}]", ids.join(","))
}
