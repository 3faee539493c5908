use cdt_core::{MoveType, Triangulation};
use cdt_mcmc::{check_move, MoveCommand};
use cdt_triangulation::Manifold;

fn manifold() -> Manifold {
    Manifold::new(640, 4).unwrap()
}

fn run_moves(manifold: &Manifold, moves: &[MoveType]) -> MoveCommand {
    let mut command = MoveCommand::with_seed(manifold, 42);
    for move_type in moves {
        command.enqueue(*move_type);
    }
    command.execute();
    command
}

#[test]
fn command_owns_a_distinct_copy() {
    let manifold = manifold();
    let command = MoveCommand::new(&manifold);
    assert!(!std::ptr::eq(command.get_manifold(), &manifold));
    assert_eq!(command.get_manifold().geometry(), manifold.geometry());
}

#[test]
fn null_move_changes_nothing() {
    let manifold = manifold();
    let command = run_moves(&manifold, &[MoveType::Null]);
    let result = command.get_manifold();
    assert_eq!(result.n3(), manifold.n3());
    assert_eq!(result.n1_tl(), manifold.n1_tl());
    assert_eq!(result.n1_sl(), manifold.n1_sl());
    assert_eq!(command.get_succeeded()[MoveType::Null], 1);
    assert!(check_move(&manifold, result, MoveType::Null));
}

#[test]
fn two_three_through_a_command_adds_one_cell() {
    let manifold = manifold();
    assert!(manifold.is_correct());
    let original = manifold.get_triangulation().number_of_finite_cells();

    let mut command = MoveCommand::new(&manifold);
    command.enqueue(MoveType::TwoThree);
    assert_eq!(command.size(), 1);
    command.execute();
    assert_eq!(command.size(), 0);

    let result = command.get_results();
    assert_eq!(result.get_triangulation().number_of_finite_cells(), original + 1);
    assert!(check_move(&manifold, result, MoveType::TwoThree));
    assert_eq!(manifold.get_triangulation().number_of_finite_cells(), original);
}

#[test]
fn three_two_removes_one_cell() {
    let grown = run_moves(&manifold(), &[MoveType::TwoThree]).into_manifold();
    let command = run_moves(&grown, &[MoveType::ThreeTwo]);
    assert_eq!(command.get_succeeded()[MoveType::ThreeTwo], 1);
    assert_eq!(command.get_manifold().n3(), grown.n3() - 1);
    assert!(check_move(&grown, command.get_manifold(), MoveType::ThreeTwo));
}

#[test]
fn two_six_adds_four_cells() {
    let manifold = manifold();
    let command = run_moves(&manifold, &[MoveType::TwoSix]);
    assert_eq!(command.get_manifold().n3(), manifold.n3() + 4);
    assert!(check_move(&manifold, command.get_manifold(), MoveType::TwoSix));
}

#[test]
fn six_two_removes_four_cells() {
    let grown = run_moves(&manifold(), &[MoveType::TwoSix]).into_manifold();
    let command = run_moves(&grown, &[MoveType::SixTwo]);
    assert_eq!(command.get_manifold().n3(), grown.n3() - 4);
    assert!(check_move(&grown, command.get_manifold(), MoveType::SixTwo));
}

#[test]
fn four_four_keeps_counts() {
    let manifold = manifold();
    let command = run_moves(&manifold, &[MoveType::FourFour]);
    assert_eq!(command.get_succeeded()[MoveType::FourFour], 1);
    assert_eq!(command.get_manifold().n3(), manifold.n3());
    assert!(check_move(&manifold, command.get_manifold(), MoveType::FourFour));
}

#[test]
fn two_three_then_three_two_cancel() {
    let manifold = manifold();
    let command = run_moves(&manifold, &[MoveType::TwoThree, MoveType::ThreeTwo]);
    assert_eq!(command.get_failed().total(), 0);
    assert_eq!(command.get_manifold().n3(), manifold.n3());
    assert!(command.get_manifold().is_correct());
}

#[test]
fn five_canonical_moves_cancel() {
    let manifold = manifold();
    for seed in 0..20 {
        let mut command = MoveCommand::with_seed(&manifold, seed);
        for move_type in [
            MoveType::TwoThree,
            MoveType::TwoSix,
            MoveType::FourFour,
            MoveType::SixTwo,
            MoveType::ThreeTwo,
        ] {
            command.enqueue(move_type);
        }
        command.execute();
        assert_eq!(command.get_failed().total(), 0, "seed {seed}");
        assert_eq!(command.get_succeeded().total(), 5, "seed {seed}");
        assert_eq!(command.get_manifold().geometry(), manifold.geometry());
        assert!(command.get_manifold().is_correct());
    }
}

#[test]
fn queued_moves_run_in_order() {
    let manifold = manifold();

    let forward = run_moves(&manifold, &[MoveType::TwoSix, MoveType::SixTwo]);
    assert_eq!(forward.get_succeeded().total(), 2);
    assert_eq!(forward.get_manifold().n3(), manifold.n3());

    let backward = run_moves(&manifold, &[MoveType::SixTwo, MoveType::TwoSix]);
    assert_eq!(backward.get_failed()[MoveType::SixTwo], 1);
    assert_eq!(backward.get_succeeded()[MoveType::TwoSix], 1);
    assert_eq!(backward.errors().len(), 1);
    assert_eq!(backward.errors()[0].move_type, MoveType::SixTwo);
    assert_eq!(backward.errors()[0].error.code(), "no-valid-site");
    assert_eq!(backward.get_manifold().n3(), manifold.n3() + 4);
}

#[test]
fn ledgers_describe_the_latest_execution() {
    let manifold = manifold();
    let mut command = MoveCommand::new(&manifold);
    command.enqueue(MoveType::TwoThree);
    command.enqueue(MoveType::SixTwo);
    command.execute();
    assert_eq!(command.get_attempted().total(), 2);
    assert_eq!(command.get_failed().total(), 1);
    command.print_errors();

    command.enqueue(MoveType::Null);
    command.execute();
    assert_eq!(command.get_attempted().total(), 1);
    assert_eq!(command.get_succeeded().total(), 1);
    assert_eq!(command.get_failed().total(), 0);
    assert!(command.errors().is_empty());
    assert_eq!(command.get_manifold().n3(), manifold.n3() + 1);
}
