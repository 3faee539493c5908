use cdt_core::MoveType;
use cdt_mcmc::{Metropolis, MetropolisConfig, MoveCommand};
use cdt_triangulation::Manifold;

fn engine(passes: usize) -> Metropolis {
    Metropolis::new(MetropolisConfig::new(0.6, 1.1, 0.1, passes, 0)).unwrap()
}

fn failed_bootstrap(manifold: &Manifold) -> MoveCommand {
    let mut command = MoveCommand::with_seed(manifold, 3);
    command.enqueue(MoveType::SixTwo);
    command.enqueue(MoveType::SixTwo);
    command.execute();
    command
}

#[test]
fn bootstrap_without_successes_is_rejected() {
    let manifold = Manifold::new(200, 3).unwrap();
    let mut engine = engine(1);
    let command = failed_bootstrap(&manifold);
    assert_eq!(command.get_failed().total(), 2);

    let err = engine.fold_bootstrap(command).unwrap_err();
    assert_eq!(err.code(), "initialization-failed");
    assert_eq!(engine.get_attempted().total(), 0);
    assert_eq!(engine.get_failed().total(), 0);
    assert_eq!(engine.calculate_a1(MoveType::TwoThree).unwrap(), 0.2);
}

#[test]
fn failed_bootstrap_runs_from_the_original_manifold() {
    let manifold = Manifold::new(200, 3).unwrap();
    let mut engine = engine(1);
    let bootstrap = engine.fold_bootstrap(failed_bootstrap(&manifold));
    assert!(bootstrap.is_err());

    let result = engine.run_from(&manifold, bootstrap).unwrap();
    let summary = engine.summary();
    assert!(result.is_correct());
    assert_eq!(summary.final_geometry, *result.geometry());
    assert_eq!(summary.samples.len(), 1);

    let pass = &summary.samples[0];
    assert_eq!(pass.proposed, manifold.n3() as u64);
    assert_eq!(summary.trial.total(), pass.proposed);
    assert_eq!(summary.attempted.total(), pass.accepted);
    assert_eq!(summary.succeeded.total(), pass.succeeded);
    assert_eq!(summary.failed.total(), pass.failed);
}

#[test]
fn successful_bootstrap_is_folded() {
    let manifold = Manifold::new(200, 3).unwrap();
    let mut engine = engine(1);
    let command = engine.initialize(&manifold).unwrap();
    assert!(command.get_succeeded().total() > 0);
    assert_eq!(engine.get_attempted().total(), 5);
    assert_eq!(engine.geometry(), command.get_manifold().geometry());
}
