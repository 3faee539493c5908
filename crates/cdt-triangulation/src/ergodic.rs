use std::collections::BTreeSet;

use cdt_core::errors::{CdtError, ErrorInfo};
use cdt_core::{CellType, EdgeType, MoveType, VertexId};

use crate::incidence::Incidence;
use crate::simplex::{
    describe, edges_of_facet, facets_of, next_slice, opposite, previous_slice, sorted_cell, sorted_edge,
    sorted_facet, Cell, Edge, Facet,
};
use crate::triangulation::FoliatedTriangulation;

/// Planned local rewrite of a triangulation.
///
/// Plans are computed against an immutable triangulation and applied with
/// [`apply_rewrite`]; a plan that no longer matches is rejected without
/// touching the triangulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Move that produced the plan.
    pub move_type: MoveType,
    /// Cells removed by the rewrite.
    pub removed: Vec<Cell>,
    /// Cells added by the rewrite.
    pub added: Vec<Cell>,
    /// Vertex created by the rewrite, with its timeslice.
    pub inserted_vertex: Option<(VertexId, u32)>,
    /// Vertex deleted by the rewrite.
    pub removed_vertex: Option<VertexId>,
}

impl Rewrite {
    fn cells(move_type: MoveType, removed: Vec<Cell>, added: Vec<Cell>) -> Self {
        Self {
            move_type,
            removed,
            added,
            inserted_vertex: None,
            removed_vertex: None,
        }
    }
}

fn rejected(move_type: MoveType, code: &str, message: &str) -> CdtError {
    CdtError::Move(ErrorInfo::new(code, message).with_context("move", move_type.as_str()))
}

fn time(
    triangulation: &FoliatedTriangulation,
    vertex: VertexId,
    move_type: MoveType,
) -> Result<u32, CdtError> {
    triangulation.time_of(vertex).ok_or_else(|| {
        CdtError::Move(
            ErrorInfo::new("unknown-vertex", "site references a vertex that does not exist")
                .with_context("move", move_type.as_str())
                .with_context("vertex", vertex.as_raw().to_string()),
        )
    })
}

/// (2,2) cells paired with each of their facets.
pub fn candidates_23(triangulation: &FoliatedTriangulation) -> Vec<(Cell, Facet)> {
    triangulation
        .cells()
        .filter(|cell| triangulation.cell_type(cell) == Some(CellType::TwoTwo))
        .flat_map(|cell| facets_of(cell).into_iter().map(move |facet| (*cell, facet)))
        .collect()
}

/// Timelike edges shared by exactly three cells.
pub fn candidates_32(triangulation: &FoliatedTriangulation, incidence: &Incidence) -> Vec<Edge> {
    incidence
        .edges()
        .filter(|(edge, cells)| {
            cells.len() == 3 && triangulation.edge_type(edge) == Some(EdgeType::Timelike)
        })
        .map(|(edge, _)| *edge)
        .collect()
}

/// Spacelike triangles.
pub fn candidates_26(triangulation: &FoliatedTriangulation, incidence: &Incidence) -> Vec<Facet> {
    incidence
        .facets()
        .filter(|(facet, _)| {
            edges_of_facet(facet)
                .iter()
                .all(|edge| triangulation.edge_type(edge) == Some(EdgeType::Spacelike))
        })
        .map(|(facet, _)| *facet)
        .collect()
}

/// Vertices contained in exactly six cells.
pub fn candidates_62(incidence: &Incidence) -> Vec<VertexId> {
    incidence
        .vertices()
        .filter(|(_, cells)| cells.len() == 6)
        .map(|(vertex, _)| vertex)
        .collect()
}

/// Spacelike edges shared by exactly four cells.
pub fn candidates_44(triangulation: &FoliatedTriangulation, incidence: &Incidence) -> Vec<Edge> {
    incidence
        .edges()
        .filter(|(edge, cells)| {
            cells.len() == 4 && triangulation.edge_type(edge) == Some(EdgeType::Spacelike)
        })
        .map(|(edge, _)| *edge)
        .collect()
}

/// Plans a (2,3) move through `facet` of the (2,2) cell `cell`.
///
/// The cell and its neighbour across the facet are replaced by three cells
/// around the new timelike edge joining their opposite vertices.
pub fn plan_23(
    triangulation: &FoliatedTriangulation,
    incidence: &Incidence,
    cell: &Cell,
    facet: &Facet,
) -> Result<Rewrite, CdtError> {
    let move_type = MoveType::TwoThree;
    if triangulation.cell_type(cell) != Some(CellType::TwoTwo) {
        return Err(rejected(move_type, "not-two-two", "(2,3) move starts from a (2,2) cell"));
    }
    let top = opposite(cell, facet)
        .ok_or_else(|| rejected(move_type, "facet-not-in-cell", "facet is not a face of the cell"))?;
    let neighbour = incidence
        .cells_of_facet(facet)
        .iter()
        .find(|other| *other != cell)
        .copied()
        .ok_or_else(|| rejected(move_type, "missing-neighbour", "facet has no neighbouring cell"))?;
    let bottom = opposite(&neighbour, facet)
        .ok_or_else(|| rejected(move_type, "facet-not-in-cell", "facet is not a face of the neighbour"))?;

    let new_edge = sorted_edge(top, bottom);
    if triangulation.edge_type(&new_edge) != Some(EdgeType::Timelike) {
        return Err(rejected(move_type, "spacelike-diagonal", "opposite vertices share a timeslice"));
    }
    if incidence.has_edge(&new_edge) {
        return Err(rejected(move_type, "edge-exists", "the new timelike edge already exists"));
    }

    let added: Vec<Cell> = facet
        .iter()
        .map(|skipped| {
            let [x, y] = other_two(facet, *skipped);
            sorted_cell([x, y, top, bottom])
        })
        .collect();
    if added.iter().any(|cell| triangulation.cell_type(cell).is_none()) {
        return Err(rejected(move_type, "unclassified-cell", "replacement cell breaks the foliation"));
    }
    Ok(Rewrite::cells(move_type, vec![*cell, neighbour], added))
}

/// Plans a (3,2) move removing the timelike `edge` shared by three cells.
pub fn plan_32(
    triangulation: &FoliatedTriangulation,
    incidence: &Incidence,
    edge: &Edge,
) -> Result<Rewrite, CdtError> {
    let move_type = MoveType::ThreeTwo;
    if triangulation.edge_type(edge) != Some(EdgeType::Timelike) {
        return Err(rejected(move_type, "not-timelike", "(3,2) move removes a timelike edge"));
    }
    let cells = incidence.cells_of_edge(edge);
    if cells.len() != 3 {
        return Err(rejected(move_type, "degree-not-three", "edge is not shared by exactly three cells"));
    }
    let ring: BTreeSet<VertexId> = cells
        .iter()
        .flat_map(|cell| cell.iter().copied())
        .filter(|v| !edge.contains(v))
        .collect();
    let ring: Vec<VertexId> = ring.into_iter().collect();
    let [a, b, c] = ring[..] else {
        return Err(rejected(move_type, "ring-not-triangle", "edge link is not a triangle"));
    };
    if incidence.has_facet(&sorted_facet([a, b, c])) {
        return Err(rejected(move_type, "facet-exists", "the replacement triangle already exists"));
    }
    let [low, high] = *edge;
    let added = vec![sorted_cell([a, b, c, low]), sorted_cell([a, b, c, high])];
    if added.iter().any(|cell| triangulation.cell_type(cell).is_none()) {
        return Err(rejected(move_type, "unclassified-cell", "replacement cell breaks the foliation"));
    }
    Ok(Rewrite::cells(move_type, cells.to_vec(), added))
}

/// Plans a (2,6) move inserting a vertex into the spacelike `facet`.
pub fn plan_26(
    triangulation: &FoliatedTriangulation,
    incidence: &Incidence,
    facet: &Facet,
) -> Result<Rewrite, CdtError> {
    let move_type = MoveType::TwoSix;
    let slice = time(triangulation, facet[0], move_type)?;
    for vertex in &facet[1..] {
        if time(triangulation, *vertex, move_type)? != slice {
            return Err(rejected(move_type, "not-spacelike", "(2,6) move needs a spacelike triangle"));
        }
    }
    let cells = incidence.cells_of_facet(facet);
    let timeslices = triangulation.timeslices();
    let mut above = None;
    let mut below = None;
    for cell in cells {
        let Some(apex) = opposite(cell, facet) else {
            continue;
        };
        let apex_time = time(triangulation, apex, move_type)?;
        if apex_time == next_slice(slice, timeslices) {
            above = Some(apex);
        } else if apex_time == previous_slice(slice, timeslices) {
            below = Some(apex);
        }
    }
    let (Some(up), Some(down), 2) = (above, below, cells.len()) else {
        return Err(rejected(
            move_type,
            "missing-apex",
            "spacelike triangle must bound a (3,1) and a (1,3) cell",
        ));
    };

    let centre = triangulation.next_vertex_id();
    let mut added = Vec::with_capacity(6);
    for [x, y] in edges_of_facet(facet) {
        added.push(sorted_cell([x, y, centre, up]));
        added.push(sorted_cell([x, y, centre, down]));
    }
    Ok(Rewrite {
        move_type,
        removed: cells.to_vec(),
        added,
        inserted_vertex: Some((centre, slice)),
        removed_vertex: None,
    })
}

/// Plans a (6,2) move removing `vertex`, the inverse of a (2,6) move.
pub fn plan_62(
    triangulation: &FoliatedTriangulation,
    incidence: &Incidence,
    vertex: VertexId,
) -> Result<Rewrite, CdtError> {
    let move_type = MoveType::SixTwo;
    let slice = time(triangulation, vertex, move_type)?;
    let cells = incidence.cells_of_vertex(vertex);
    if cells.len() != 6 {
        return Err(rejected(move_type, "degree-not-six", "vertex is not shared by exactly six cells"));
    }
    let timeslices = triangulation.timeslices();
    let mut spatial = Vec::new();
    let mut above = Vec::new();
    let mut below = Vec::new();
    let neighbours: BTreeSet<VertexId> = cells
        .iter()
        .flat_map(|cell| cell.iter().copied())
        .filter(|v| *v != vertex)
        .collect();
    for neighbour in neighbours {
        let t = time(triangulation, neighbour, move_type)?;
        if t == slice {
            spatial.push(neighbour);
        } else if t == next_slice(slice, timeslices) {
            above.push(neighbour);
        } else if t == previous_slice(slice, timeslices) {
            below.push(neighbour);
        }
    }
    let (&[a, b, c], &[up], &[down]) = (spatial.as_slice(), above.as_slice(), below.as_slice())
    else {
        return Err(rejected(
            move_type,
            "unexpected-star",
            "vertex must have three spatial neighbours and one neighbour above and below",
        ));
    };
    let base = sorted_facet([a, b, c]);
    if incidence.has_facet(&base) {
        return Err(rejected(move_type, "facet-exists", "the replacement triangle already exists"));
    }
    let expected: BTreeSet<Cell> = edges_of_facet(&base)
        .into_iter()
        .flat_map(|[x, y]| {
            [
                sorted_cell([x, y, vertex, up]),
                sorted_cell([x, y, vertex, down]),
            ]
        })
        .collect();
    let actual: BTreeSet<Cell> = cells.iter().copied().collect();
    if expected != actual {
        return Err(rejected(move_type, "unexpected-star", "vertex star is not the image of a (2,6) move"));
    }
    Ok(Rewrite {
        move_type,
        removed: cells.to_vec(),
        added: vec![sorted_cell([a, b, c, up]), sorted_cell([a, b, c, down])],
        inserted_vertex: None,
        removed_vertex: Some(vertex),
    })
}

/// Plans a (4,4) move flipping the spacelike `edge` shared by four cells.
pub fn plan_44(
    triangulation: &FoliatedTriangulation,
    incidence: &Incidence,
    edge: &Edge,
) -> Result<Rewrite, CdtError> {
    let move_type = MoveType::FourFour;
    if triangulation.edge_type(edge) != Some(EdgeType::Spacelike) {
        return Err(rejected(move_type, "not-spacelike", "(4,4) move flips a spacelike edge"));
    }
    let cells = incidence.cells_of_edge(edge);
    if cells.len() != 4 {
        return Err(rejected(move_type, "degree-not-four", "edge is not shared by exactly four cells"));
    }
    let [x, y] = *edge;
    let slice = time(triangulation, x, move_type)?;
    let timeslices = triangulation.timeslices();
    let mut spatial = BTreeSet::new();
    let mut above = BTreeSet::new();
    let mut below = BTreeSet::new();
    for vertex in cells.iter().flat_map(|cell| cell.iter().copied()) {
        if vertex == x || vertex == y {
            continue;
        }
        let t = time(triangulation, vertex, move_type)?;
        if t == slice {
            spatial.insert(vertex);
        } else if t == next_slice(slice, timeslices) {
            above.insert(vertex);
        } else if t == previous_slice(slice, timeslices) {
            below.insert(vertex);
        }
    }
    let spatial: Vec<VertexId> = spatial.into_iter().collect();
    let above: Vec<VertexId> = above.into_iter().collect();
    let below: Vec<VertexId> = below.into_iter().collect();
    let (&[b, d], &[up], &[down]) = (spatial.as_slice(), above.as_slice(), below.as_slice())
    else {
        return Err(rejected(
            move_type,
            "unexpected-star",
            "edge must border two spatial triangles with single apexes above and below",
        ));
    };
    let expected: BTreeSet<Cell> = [b, d]
        .into_iter()
        .flat_map(|side| [sorted_cell([x, y, side, up]), sorted_cell([x, y, side, down])])
        .collect();
    let actual: BTreeSet<Cell> = cells.iter().copied().collect();
    if expected != actual {
        return Err(rejected(move_type, "unexpected-star", "edge star is not flippable"));
    }
    if incidence.has_edge(&sorted_edge(b, d)) {
        return Err(rejected(move_type, "edge-exists", "the flipped edge already exists"));
    }
    let added = [x, y]
        .into_iter()
        .flat_map(|end| [sorted_cell([b, d, end, up]), sorted_cell([b, d, end, down])])
        .collect();
    Ok(Rewrite::cells(move_type, cells.to_vec(), added))
}

/// Applies a planned rewrite, leaving the triangulation untouched if the plan is stale.
pub fn apply_rewrite(
    triangulation: &mut FoliatedTriangulation,
    rewrite: &Rewrite,
) -> Result<(), CdtError> {
    let stale = |code: &str, message: &str| {
        ErrorInfo::new(code, message).with_context("move", rewrite.move_type.as_str())
    };
    if let Some(missing) = rewrite
        .removed
        .iter()
        .find(|cell| !triangulation.contains_cell(cell))
    {
        return Err(CdtError::Move(
            stale("stale-rewrite", "rewrite removes a cell that is not present")
                .with_context("cell", describe(missing)),
        ));
    }
    if rewrite
        .added
        .iter()
        .any(|cell| triangulation.contains_cell(cell) && !rewrite.removed.contains(cell))
    {
        return Err(CdtError::Move(stale(
            "cell-exists",
            "rewrite adds a cell that is already present",
        )));
    }
    if let Some((vertex, _)) = rewrite.inserted_vertex {
        if triangulation.contains_vertex(vertex) {
            return Err(CdtError::Move(
                stale("vertex-exists", "rewrite inserts a vertex that is already present")
                    .with_context("vertex", vertex.as_raw().to_string()),
            ));
        }
    }

    for cell in &rewrite.removed {
        triangulation.remove_cell(cell);
    }
    if let Some((vertex, time)) = rewrite.inserted_vertex {
        triangulation.insert_vertex(vertex, time)?;
    }
    for cell in &rewrite.added {
        triangulation.insert_cell(*cell);
    }
    if let Some(vertex) = rewrite.removed_vertex {
        triangulation.remove_vertex(vertex);
    }
    Ok(())
}

fn other_two(facet: &Facet, skipped: VertexId) -> [VertexId; 2] {
    let mut rest = facet.iter().copied().filter(|v| *v != skipped);
    let first = rest.next().unwrap_or(skipped);
    let second = rest.next().unwrap_or(skipped);
    [first, second]
}
