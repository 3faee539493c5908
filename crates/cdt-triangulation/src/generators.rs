use cdt_core::errors::{CdtError, ErrorInfo};
use cdt_core::VertexId;

use crate::triangulation::{FoliatedTriangulation, MIN_TIMESLICES};

/// Cells produced per spatial triangle per time interval.
const CELLS_PER_PRISM: usize = 3;

/// Smallest ring that still yields a simplicial bipyramid.
const MIN_RING: usize = 3;

/// Builds a foliated S²×S¹ triangulation with roughly `desired_simplices` cells.
///
/// Every timeslice is the boundary of a bipyramid over an `n`-gon (`2n`
/// triangles). Each triangle times each time interval is a prism split into a
/// (3,1), a (2,2) and a (1,3) cell along a global vertex order, so that
/// neighbouring prisms agree on their shared quadrilateral diagonals. The
/// resulting size is `6 n T` cells with `n = round(desired / 6T)`.
pub fn foliated_sphere(
    desired_simplices: usize,
    desired_timeslices: usize,
) -> Result<FoliatedTriangulation, CdtError> {
    let timeslices = u32::try_from(desired_timeslices)
        .ok()
        .filter(|&t| t >= MIN_TIMESLICES)
        .ok_or_else(|| {
            CdtError::Triangulation(
                ErrorInfo::new("too-few-timeslices", "periodic foliation needs at least three timeslices")
                    .with_context("timeslices", desired_timeslices.to_string())
                    .with_hint("request three or more timeslices"),
            )
        })?;
    let per_slab = 2 * CELLS_PER_PRISM * desired_timeslices;
    let ring = (desired_simplices + per_slab / 2) / per_slab;
    if ring < MIN_RING {
        return Err(CdtError::Triangulation(
            ErrorInfo::new("too-few-simplices", "not enough simplices for a spatial sphere per timeslice")
                .with_context("simplices", desired_simplices.to_string())
                .with_context("timeslices", desired_timeslices.to_string())
                .with_hint(format!(
                    "request at least {} simplices",
                    (2 * MIN_RING - 1) * per_slab / 2
                )),
        ));
    }
    build(ring, timeslices)
}

fn build(ring: usize, timeslices: u32) -> Result<FoliatedTriangulation, CdtError> {
    let per_slice = ring as u64 + 2;
    let north = ring;
    let south = ring + 1;
    let vertex = |time: u32, site: usize| VertexId::from_raw(time as u64 * per_slice + site as u64);

    let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(2 * ring);
    for i in 0..ring {
        let j = (i + 1) % ring;
        for pole in [north, south] {
            let mut triangle = [i, j, pole];
            triangle.sort_unstable();
            triangles.push(triangle);
        }
    }

    let vertices: Vec<(VertexId, u32)> = (0..timeslices)
        .flat_map(|time| (0..per_slice as usize).map(move |site| (time, site)))
        .map(|(time, site)| (vertex(time, site), time))
        .collect();

    let mut cells = Vec::with_capacity(CELLS_PER_PRISM * triangles.len() * timeslices as usize);
    for time in 0..timeslices {
        let next = (time + 1) % timeslices;
        for &[a, b, c] in &triangles {
            let (a0, b0, c0) = (vertex(time, a), vertex(time, b), vertex(time, c));
            let (a1, b1, c1) = (vertex(next, a), vertex(next, b), vertex(next, c));
            cells.push([a0, b0, c0, c1]);
            cells.push([a0, b0, b1, c1]);
            cells.push([a0, a1, b1, c1]);
        }
    }

    FoliatedTriangulation::from_parts(timeslices, vertices, cells)
}
