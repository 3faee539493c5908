use cdt_core::{CellType, EdgeType, Triangulation};
use cdt_triangulation::{
    foliated_sphere, validate, FoliatedTriangulation, Geometry, Manifold, MIN_TIMESLICES,
};

#[test]
fn default_geometry_is_zero() {
    let geometry = Geometry::default();
    assert_eq!(geometry.n3, 0);
    assert_eq!(geometry.n3_31, 0);
    assert_eq!(geometry.n3_22, 0);
    assert_eq!(geometry.n3_13, 0);
    assert_eq!(geometry.n2, 0);
    assert_eq!(geometry.n1, 0);
    assert_eq!(geometry.n1_tl, 0);
    assert_eq!(geometry.n1_sl, 0);
    assert_eq!(geometry.n0, 0);
}

#[test]
fn manifold_with_640_simplices_on_4_timeslices_is_correct() {
    let manifold = Manifold::new(640, 4).unwrap();
    assert!(manifold.is_correct());
    assert_eq!(manifold.n3(), 648);
    assert_eq!(manifold.min_time(), 0);
    assert_eq!(manifold.max_time(), 3);
}

#[test]
fn geometry_invariants_hold() {
    let manifold = Manifold::new(640, 4).unwrap();
    let geometry = manifold.geometry();
    assert_eq!(geometry.n3, geometry.n3_31 + geometry.n3_22 + geometry.n3_13);
    assert_eq!(geometry.n1, geometry.n1_tl + geometry.n1_sl);
    assert_ne!(geometry.n1_tl, 0);
    assert_ne!(geometry.n1_sl, 0);
    assert_eq!(geometry.n3_31_13(), geometry.n3_31 + geometry.n3_13);
    assert_eq!(geometry.n2, 2 * geometry.n3);
}

#[test]
fn generator_counts_match_staircase_construction() {
    let triangulation = foliated_sphere(640, 4).unwrap();
    let ring = 27;
    let timeslices = 4;
    assert_eq!(triangulation.number_of_vertices(), (ring + 2) * timeslices);
    assert_eq!(triangulation.number_of_finite_cells(), 6 * ring * timeslices);
    assert_eq!(triangulation.number_of_cells_of_type(CellType::ThreeOne), 2 * ring * timeslices);
    assert_eq!(triangulation.number_of_cells_of_type(CellType::TwoTwo), 2 * ring * timeslices);
    assert_eq!(triangulation.number_of_cells_of_type(CellType::OneThree), 2 * ring * timeslices);
    assert_eq!(triangulation.number_of_edges_of_type(EdgeType::Spacelike), 3 * ring * timeslices);
    assert_eq!(
        triangulation.number_of_edges_of_type(EdgeType::Timelike),
        (4 * ring + 2) * timeslices
    );
    assert_eq!(triangulation.number_of_edges(), (7 * ring + 2) * timeslices);
}

#[test]
fn every_timeslice_has_equal_volume() {
    let triangulation = FoliatedTriangulation::new(640, 4).unwrap();
    let volumes = triangulation.volume_per_timeslice();
    assert_eq!(volumes.len(), 4);
    assert!(volumes.values().all(|&volume| volume == 54));
}

#[test]
fn rejects_too_few_timeslices() {
    let err = Manifold::new(640, (MIN_TIMESLICES - 1) as usize).unwrap_err();
    assert_eq!(err.info().code, "too-few-timeslices");
    assert!(err.info().hint.is_some());
}

#[test]
fn rejects_too_few_simplices() {
    let err = Manifold::new(10, 4).unwrap_err();
    assert_eq!(err.info().code, "too-few-simplices");
}

#[test]
fn copies_are_deep() {
    let manifold = Manifold::new(640, 4).unwrap();
    let copy = manifold.clone();
    assert_eq!(copy, manifold);
    assert!(!std::ptr::eq(&copy, &manifold));
    assert_eq!(copy.geometry(), manifold.geometry());
}

#[test]
fn validation_rejects_open_complexes() {
    let triangulation = FoliatedTriangulation::new(640, 4).unwrap();
    let vertices: Vec<_> = triangulation.vertices().collect();
    let cells: Vec<_> = triangulation.cells().copied().skip(1).collect();
    let err = FoliatedTriangulation::from_parts(4, vertices, cells).unwrap_err();
    assert_eq!(err.info().code, "facet-not-manifold");
    assert!(validate(&triangulation).is_ok());
}
