use cdt_core::MoveType;
use cdt_mcmc::{simulate, Metropolis, MetropolisConfig};
use cdt_triangulation::Manifold;

fn config(seed: u64) -> MetropolisConfig {
    let mut config = MetropolisConfig::new(0.6, 1.1, 0.1, 2, 0);
    config.seed_policy.master_seed = seed;
    config.manifold.simplices = 200;
    config.manifold.timeslices = 3;
    config
}

fn run(seed: u64) -> (Manifold, cdt_mcmc::RunSummary) {
    let manifold = Manifold::new(200, 3).unwrap();
    let mut engine = Metropolis::new(config(seed)).unwrap();
    let result = engine.run(&manifold).unwrap();
    (result, engine.summary())
}

#[test]
fn same_seed_reproduces_the_run() {
    let (first_manifold, first) = run(2024);
    let (second_manifold, second) = run(2024);
    assert_eq!(first, second);
    assert_eq!(first_manifold, second_manifold);
}

#[test]
fn different_seeds_diverge() {
    let (_, first) = run(1);
    let (_, second) = run(2);
    assert_ne!(first.samples, second.samples);
}

#[test]
fn run_keeps_ledgers_consistent() {
    let (manifold, summary) = run(31);
    assert!(manifold.is_correct());
    assert_eq!(summary.final_geometry, *manifold.geometry());
    assert_eq!(summary.samples.len(), 2);
    assert_eq!(
        summary.trial.total(),
        summary.accepted.total() + summary.rejected.total()
    );
    assert_eq!(
        summary.attempted.total(),
        summary.succeeded.total() + summary.failed.total()
    );
    assert_eq!(summary.trial[MoveType::Null], 0);
    assert!(summary.unique_states >= 1);
    let proposed: u64 = summary.samples.iter().map(|sample| sample.proposed).sum();
    assert_eq!(proposed + 5, summary.trial.total());
    for rate in summary.acceptance_rates.values() {
        assert!((0.0..=1.0).contains(rate));
    }
    assert!(summary.checkpoints.is_empty());
    assert!(summary.metrics_path.is_none());
}

#[test]
fn simulate_builds_and_runs_the_configured_manifold() {
    let mut config = config(5);
    config.passes = 1;
    let (manifold, summary) = simulate(&config).unwrap();
    assert!(manifold.is_correct());
    assert_eq!(summary.samples.len(), 1);
    assert_eq!(summary.final_geometry, *manifold.geometry());
}

#[test]
fn simulate_rejects_degenerate_manifolds() {
    let mut config = config(5);
    config.manifold.timeslices = 2;
    let err = simulate(&config).unwrap_err();
    assert_eq!(err.code(), "too-few-timeslices");
}
