use cdt_core::rng::RngHandle;
use cdt_core::{CellType, VertexId};
use cdt_triangulation::{
    apply_rewrite, candidates_23, candidates_26, candidates_32, candidates_44, candidates_62,
    canonical_hash, plan_23, plan_26, plan_32, plan_44, plan_62, FoliatedTriangulation, Geometry,
    Incidence, Manifold, Rewrite,
};
use proptest::prelude::*;
use rand::seq::SliceRandom;

fn first_rewrite_23(triangulation: &FoliatedTriangulation) -> Rewrite {
    let incidence = Incidence::build(triangulation);
    candidates_23(triangulation)
        .iter()
        .find_map(|(cell, facet)| plan_23(triangulation, &incidence, cell, facet).ok())
        .expect("fresh triangulation admits a (2,3) move")
}

fn first_rewrite_26(triangulation: &FoliatedTriangulation) -> Rewrite {
    let incidence = Incidence::build(triangulation);
    candidates_26(triangulation, &incidence)
        .iter()
        .find_map(|facet| plan_26(triangulation, &incidence, facet).ok())
        .expect("fresh triangulation admits a (2,6) move")
}

#[test]
fn two_three_adds_a_two_two_cell_and_a_timelike_edge() {
    let manifold = Manifold::new(640, 4).unwrap();
    let rewrite = first_rewrite_23(manifold.get_triangulation());
    let result = manifold.apply(&rewrite).unwrap();
    assert!(result.is_correct());
    assert_eq!(result.n3(), manifold.n3() + 1);
    assert_eq!(result.n3_22(), manifold.n3_22() + 1);
    assert_eq!(result.n1_tl(), manifold.n1_tl() + 1);
    assert_eq!(result.n1_sl(), manifold.n1_sl());
}

#[test]
fn three_two_undoes_two_three() {
    let manifold = Manifold::new(640, 4).unwrap();
    let incidence = Incidence::build(manifold.get_triangulation());
    assert!(
        candidates_32(manifold.get_triangulation(), &incidence)
            .iter()
            .all(|edge| plan_32(manifold.get_triangulation(), &incidence, edge).is_err()),
        "fresh triangulation has no (3,2) site"
    );

    let grown = manifold.apply(&first_rewrite_23(manifold.get_triangulation())).unwrap();
    let triangulation = grown.get_triangulation();
    let incidence = Incidence::build(triangulation);
    let rewrite = candidates_32(triangulation, &incidence)
        .iter()
        .find_map(|edge| plan_32(triangulation, &incidence, edge).ok())
        .expect("(2,3) creates a (3,2) site");
    let shrunk = grown.apply(&rewrite).unwrap();
    assert!(shrunk.is_correct());
    assert_eq!(shrunk.n3(), grown.n3() - 1);
    assert_eq!(shrunk.n1_tl(), grown.n1_tl() - 1);
}

#[test]
fn two_six_and_six_two_are_inverse() {
    let manifold = Manifold::new(640, 4).unwrap();
    let rewrite = first_rewrite_26(manifold.get_triangulation());
    let grown = manifold.apply(&rewrite).unwrap();
    assert!(grown.is_correct());
    assert_eq!(grown.n3(), manifold.n3() + 4);
    assert_eq!(grown.n3_31(), manifold.n3_31() + 2);
    assert_eq!(grown.n3_13(), manifold.n3_13() + 2);
    assert_eq!(grown.n1_tl(), manifold.n1_tl() + 2);
    assert_eq!(grown.n1_sl(), manifold.n1_sl() + 3);
    assert_eq!(grown.n0(), manifold.n0() + 1);

    let (inserted, _) = rewrite.inserted_vertex.unwrap();
    let incidence = Incidence::build(grown.get_triangulation());
    assert_eq!(candidates_62(&incidence), vec![inserted]);
    let inverse = plan_62(grown.get_triangulation(), &incidence, inserted).unwrap();
    let restored = grown.apply(&inverse).unwrap();
    assert!(restored.is_correct());
    assert_eq!(restored.geometry(), manifold.geometry());
    assert_eq!(
        restored.get_triangulation().cells().collect::<Vec<_>>(),
        manifold.get_triangulation().cells().collect::<Vec<_>>()
    );
}

#[test]
fn six_two_needs_a_degree_six_vertex() {
    let manifold = Manifold::new(640, 4).unwrap();
    let incidence = Incidence::build(manifold.get_triangulation());
    assert!(candidates_62(&incidence).is_empty());
    let err = plan_62(manifold.get_triangulation(), &incidence, VertexId::from_raw(0)).unwrap_err();
    assert_eq!(err.info().code, "degree-not-six");
}

#[test]
fn four_four_preserves_counts() {
    let manifold = Manifold::new(640, 4).unwrap();
    let triangulation = manifold.get_triangulation();
    let incidence = Incidence::build(triangulation);
    let rewrite = candidates_44(triangulation, &incidence)
        .iter()
        .find_map(|edge| plan_44(triangulation, &incidence, edge).ok())
        .expect("pole edges of the fresh triangulation are flippable");
    let flipped = manifold.apply(&rewrite).unwrap();
    assert!(flipped.is_correct());
    assert_eq!(flipped.geometry(), manifold.geometry());
    assert_ne!(
        canonical_hash(flipped.get_triangulation()),
        canonical_hash(triangulation)
    );
}

#[test]
fn stale_rewrites_leave_the_triangulation_untouched() {
    let manifold = Manifold::new(640, 4).unwrap();
    let rewrite = first_rewrite_23(manifold.get_triangulation());
    let mut triangulation = manifold.apply(&rewrite).unwrap().into_triangulation();
    let before = triangulation.clone();
    let err = apply_rewrite(&mut triangulation, &rewrite).unwrap_err();
    assert_eq!(err.info().code, "stale-rewrite");
    assert_eq!(triangulation, before);
}

#[test]
fn planning_rejects_wrong_cell_types() {
    let triangulation = FoliatedTriangulation::new(640, 4).unwrap();
    let incidence = Incidence::build(&triangulation);
    let cell = *triangulation
        .cells()
        .find(|cell| triangulation.cell_type(cell) == Some(CellType::ThreeOne))
        .unwrap();
    let facet = [cell[0], cell[1], cell[2]];
    let err = plan_23(&triangulation, &incidence, &cell, &facet).unwrap_err();
    assert_eq!(err.info().code, "not-two-two");
}

fn random_rewrite(triangulation: &FoliatedTriangulation, choice: usize, rng: &mut RngHandle) -> Option<Rewrite> {
    let incidence = Incidence::build(triangulation);
    match choice {
        0 => {
            let mut sites = candidates_23(triangulation);
            sites.shuffle(rng);
            sites.iter().find_map(|(cell, facet)| plan_23(triangulation, &incidence, cell, facet).ok())
        }
        1 => {
            let mut sites = candidates_32(triangulation, &incidence);
            sites.shuffle(rng);
            sites.iter().find_map(|edge| plan_32(triangulation, &incidence, edge).ok())
        }
        2 => {
            let mut sites = candidates_26(triangulation, &incidence);
            sites.shuffle(rng);
            sites.iter().find_map(|facet| plan_26(triangulation, &incidence, facet).ok())
        }
        3 => {
            let mut sites = candidates_62(&incidence);
            sites.shuffle(rng);
            sites.iter().find_map(|vertex| plan_62(triangulation, &incidence, *vertex).ok())
        }
        _ => {
            let mut sites = candidates_44(triangulation, &incidence);
            sites.shuffle(rng);
            sites.iter().find_map(|edge| plan_44(triangulation, &incidence, edge).ok())
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn random_move_sequences_stay_valid(seed in any::<u64>(), choices in proptest::collection::vec(0usize..5, 1..24)) {
        let mut rng = RngHandle::from_seed(seed);
        let mut manifold = Manifold::new(200, 3).unwrap();
        for choice in choices {
            if let Some(rewrite) = random_rewrite(manifold.get_triangulation(), choice, &mut rng) {
                manifold = manifold.apply(&rewrite).unwrap();
                prop_assert!(manifold.get_triangulation().validate().is_ok());
                prop_assert_eq!(*manifold.geometry(), Geometry::from_triangulation(manifold.get_triangulation()));
            }
        }
    }
}
