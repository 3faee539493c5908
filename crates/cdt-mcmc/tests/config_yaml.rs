use std::fs;

use cdt_core::DEFAULT_PRECISION_BITS;
use cdt_mcmc::{Metropolis, MetropolisConfig};
use tempfile::tempdir;

#[test]
fn defaults_are_valid() {
    let config = MetropolisConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.precision_bits, DEFAULT_PRECISION_BITS);
    assert_eq!(config.manifold.dimension, 3);
    assert!(config.output.run_directory.is_none());
}

#[test]
fn partial_yaml_fills_defaults() {
    let yaml = "alpha: 0.6\nk: 1.1\nlambda: 0.1\npasses: 20\ncheckpoint: 5\nseed_policy:\n  master_seed: 99\nmanifold:\n  simplices: 1200\n  timeslices: 6\n";
    let config = MetropolisConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.passes, 20);
    assert_eq!(config.checkpoint, 5);
    assert_eq!(config.seed_policy.master_seed, 99);
    assert_eq!(config.manifold.simplices, 1200);
    assert_eq!(config.manifold.dimension, 3);
    assert_eq!(config.precision_bits, DEFAULT_PRECISION_BITS);
    assert_eq!(config.initial_radius, 1.0);
}

#[test]
fn malformed_yaml_is_a_config_error() {
    let err = MetropolisConfig::from_yaml_str("passes: many").unwrap_err();
    assert_eq!(err.code(), "config-parse");
}

#[test]
fn loads_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    fs::write(&path, "passes: 3\nprecision_bits: 128\n").unwrap();
    let config = MetropolisConfig::load(&path).unwrap();
    assert_eq!(config.passes, 3);
    assert_eq!(config.precision_bits, 128);

    let missing = MetropolisConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert_eq!(missing.code(), "config-read");
}

#[test]
fn rejects_invalid_settings() {
    let cases = [
        (MetropolisConfig::new(f64::NAN, 1.1, 0.1, 10, 1), "non-finite-coupling"),
        (MetropolisConfig::new(0.6, f64::INFINITY, 0.1, 10, 1), "non-finite-coupling"),
        (MetropolisConfig::new(0.0, 1.1, 0.1, 10, 1), "non-positive-alpha"),
        (MetropolisConfig::new(-0.5, 1.1, 0.1, 10, 1), "non-positive-alpha"),
        (MetropolisConfig::new(0.6, 1.1, 0.1, 0, 1), "zero-passes"),
    ];
    for (config, code) in cases {
        assert_eq!(config.validate().unwrap_err().code(), code);
        assert_eq!(Metropolis::new(config).unwrap_err().code(), code);
    }

    let mut narrow = MetropolisConfig::default();
    narrow.precision_bits = 32;
    assert_eq!(narrow.validate().unwrap_err().code(), "insufficient-precision");

    let mut four_dimensional = MetropolisConfig::default();
    four_dimensional.manifold.dimension = 4;
    assert_eq!(
        four_dimensional.validate().unwrap_err().code(),
        "unsupported-dimension"
    );
}
