//! Structural checks for foliated triangulations.
//!
//! A triangulation is accepted when it is a closed pseudo-manifold whose edge
//! links are single cycles, whose Euler characteristic vanishes, and whose
//! simplices all respect the foliation.

use std::collections::{BTreeMap, BTreeSet};

use cdt_core::errors::{CdtError, ErrorInfo};
use cdt_core::{EdgeType, VertexId};

use crate::incidence::Incidence;
use crate::simplex::{describe, Cell, Edge};
use crate::triangulation::{FoliatedTriangulation, MIN_TIMESLICES};

/// Runs every check and reports the first violation.
pub fn validate(triangulation: &FoliatedTriangulation) -> Result<(), CdtError> {
    check_labels(triangulation)?;
    check_cells(triangulation)?;
    let incidence = Incidence::build(triangulation);
    check_edges(triangulation, &incidence)?;
    check_facet_degree(&incidence)?;
    check_edge_links(&incidence)?;
    check_vertex_usage(triangulation, &incidence)?;
    check_euler_characteristic(triangulation, &incidence)?;
    Ok(())
}

fn invalid(code: &str, message: impl Into<String>) -> ErrorInfo {
    ErrorInfo::new(code, message)
}

fn check_labels(triangulation: &FoliatedTriangulation) -> Result<(), CdtError> {
    let timeslices = triangulation.timeslices();
    if timeslices < MIN_TIMESLICES {
        return Err(CdtError::Triangulation(
            invalid("too-few-timeslices", "foliation needs at least three timeslices")
                .with_context("timeslices", timeslices.to_string()),
        ));
    }
    let mut populated = BTreeSet::new();
    for (vertex, time) in triangulation.vertices() {
        if time >= timeslices {
            return Err(CdtError::Triangulation(
                invalid("vertex-time-out-of-range", "timeslice label exceeds foliation")
                    .with_context("vertex", vertex.as_raw().to_string())
                    .with_context("time", time.to_string()),
            ));
        }
        populated.insert(time);
    }
    if populated.len() != timeslices as usize {
        return Err(CdtError::Triangulation(
            invalid("empty-timeslice", "every timeslice must carry vertices")
                .with_context("populated", populated.len().to_string())
                .with_context("timeslices", timeslices.to_string()),
        ));
    }
    Ok(())
}

fn check_cells(triangulation: &FoliatedTriangulation) -> Result<(), CdtError> {
    if triangulation.cells().len() == 0 {
        return Err(CdtError::Triangulation(invalid(
            "empty-triangulation",
            "triangulation has no cells",
        )));
    }
    for cell in triangulation.cells() {
        if cell.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(CdtError::Triangulation(
                invalid("degenerate-cell", "cell repeats a vertex")
                    .with_context("cell", describe(cell)),
            ));
        }
        if let Some(missing) = cell.iter().find(|v| !triangulation.contains_vertex(**v)) {
            return Err(CdtError::Triangulation(
                invalid("unknown-vertex", "cell references a vertex that does not exist")
                    .with_context("cell", describe(cell))
                    .with_context("vertex", missing.as_raw().to_string()),
            ));
        }
        if triangulation.cell_type(cell).is_none() {
            return Err(CdtError::Triangulation(
                invalid("unclassified-cell", "cell does not span two adjacent timeslices")
                    .with_context("cell", describe(cell)),
            ));
        }
    }
    Ok(())
}

fn check_edges(
    triangulation: &FoliatedTriangulation,
    incidence: &Incidence,
) -> Result<(), CdtError> {
    let mut timelike = 0usize;
    let mut spacelike = 0usize;
    for (edge, _) in incidence.edges() {
        match triangulation.edge_type(edge) {
            Some(EdgeType::Timelike) => timelike += 1,
            Some(EdgeType::Spacelike) => spacelike += 1,
            None => {
                return Err(CdtError::Triangulation(
                    invalid("unclassified-edge", "edge joins non-adjacent timeslices")
                        .with_context("edge", describe(edge)),
                ))
            }
        }
    }
    if timelike == 0 || spacelike == 0 {
        return Err(CdtError::Triangulation(
            invalid("missing-edge-class", "foliation needs timelike and spacelike edges")
                .with_context("timelike", timelike.to_string())
                .with_context("spacelike", spacelike.to_string()),
        ));
    }
    Ok(())
}

fn check_facet_degree(incidence: &Incidence) -> Result<(), CdtError> {
    for (facet, cells) in incidence.facets() {
        if cells.len() != 2 {
            return Err(CdtError::Triangulation(
                invalid("facet-not-manifold", "every triangle must bound exactly two cells")
                    .with_context("facet", describe(facet))
                    .with_context("cells", cells.len().to_string()),
            ));
        }
    }
    Ok(())
}

fn check_edge_links(incidence: &Incidence) -> Result<(), CdtError> {
    for (edge, cells) in incidence.edges() {
        if !link_is_cycle(edge, cells) {
            return Err(CdtError::Triangulation(
                invalid("edge-link-not-cycle", "link of an edge must be a single cycle")
                    .with_context("edge", describe(edge))
                    .with_context("cells", cells.len().to_string()),
            ));
        }
    }
    Ok(())
}

/// Returns true when the link of `edge` inside `cells` is one connected cycle.
pub(crate) fn link_is_cycle(edge: &Edge, cells: &[Cell]) -> bool {
    if cells.len() < 3 {
        return false;
    }
    let mut adjacency: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();
    for cell in cells {
        let mut rest = cell.iter().copied().filter(|v| !edge.contains(v));
        let (Some(a), Some(b), None) = (rest.next(), rest.next(), rest.next()) else {
            return false;
        };
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }
    if adjacency.values().any(|neighbours| neighbours.len() != 2) {
        return false;
    }
    let Some((&start, first)) = adjacency.iter().next() else {
        return false;
    };
    let mut previous = start;
    let mut current = first[0];
    let mut steps = 1usize;
    while current != start {
        let Some(&[left, right]) = adjacency.get(&current).map(Vec::as_slice) else {
            return false;
        };
        let next = if left == previous { right } else { left };
        previous = current;
        current = next;
        steps += 1;
        if steps > cells.len() {
            return false;
        }
    }
    steps == adjacency.len()
}

fn check_vertex_usage(
    triangulation: &FoliatedTriangulation,
    incidence: &Incidence,
) -> Result<(), CdtError> {
    for (vertex, _) in triangulation.vertices() {
        if incidence.cells_of_vertex(vertex).is_empty() {
            return Err(CdtError::Triangulation(
                invalid("isolated-vertex", "vertex is not part of any cell")
                    .with_context("vertex", vertex.as_raw().to_string()),
            ));
        }
    }
    Ok(())
}

fn check_euler_characteristic(
    triangulation: &FoliatedTriangulation,
    incidence: &Incidence,
) -> Result<(), CdtError> {
    let vertices = triangulation.vertices().len() as i64;
    let edges = incidence.edges().len() as i64;
    let facets = incidence.facets().len() as i64;
    let cells = triangulation.cells().len() as i64;
    let euler = vertices - edges + facets - cells;
    if euler != 0 {
        return Err(CdtError::Triangulation(
            invalid("euler-characteristic", "closed 3-manifold must have Euler characteristic 0")
                .with_context("euler", euler.to_string()),
        ));
    }
    Ok(())
}
