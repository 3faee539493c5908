use std::fs;

use cdt_mcmc::checkpoint::checkpoint_path;
use cdt_mcmc::manifest::RunManifest;
use cdt_mcmc::{write_file, CheckpointMetadata, CheckpointPayload, Metropolis, MetropolisConfig};
use cdt_triangulation::Manifold;
use tempfile::tempdir;

#[test]
fn run_writes_checkpoints_metrics_and_manifest() {
    let dir = tempdir().unwrap();
    let run_directory = dir.path().join("run");
    let mut config = MetropolisConfig::new(0.6, 1.1, 0.1, 2, 1);
    config.output.run_directory = Some(run_directory.clone());

    let manifold = Manifold::new(200, 3).unwrap();
    let mut engine = Metropolis::new(config).unwrap();
    let result = engine.run(&manifold).unwrap();
    let summary = engine.summary();

    let checkpoint_dir = run_directory.join("checkpoints");
    assert_eq!(
        summary.checkpoints,
        vec![checkpoint_path(&checkpoint_dir, 1), checkpoint_path(&checkpoint_dir, 2)]
    );
    assert!(summary.checkpoints[0].ends_with("ckpt_00001.json"));

    let payload = CheckpointPayload::load(&summary.checkpoints[1]).unwrap();
    assert_eq!(payload.metadata.pass, 2);
    assert_eq!(payload.metadata.n3, result.n3());
    assert_eq!(payload.metadata.dimension, 3);
    assert_eq!(payload.restore().unwrap(), result);

    let metrics = fs::read_to_string(summary.metrics_path.as_ref().unwrap()).unwrap();
    assert_eq!(metrics.lines().count(), 3);
    assert!(metrics.starts_with("pass,n3"));

    let manifest = RunManifest::load(summary.manifest_path.as_ref().unwrap()).unwrap();
    assert_eq!(manifest.final_geometry, *result.geometry());
    assert_eq!(manifest.checkpoints.len(), 2);
    assert!(manifest.checkpoints[0].starts_with("checkpoints"));
}

#[test]
fn write_file_round_trips() {
    let dir = tempdir().unwrap();
    let manifold = Manifold::new(300, 3).unwrap();
    let metadata = CheckpointMetadata::new(&manifold, 1.0, 1.0, 7);
    let path = write_file(dir.path(), &manifold, metadata, 11).unwrap();
    assert_eq!(path, checkpoint_path(dir.path(), 7));

    let payload = CheckpointPayload::load(&path).unwrap();
    assert_eq!(payload.provenance.seed, 11);
    assert_eq!(payload.metadata.max_time, manifold.max_time());
    assert_eq!(payload.metadata.topology, "s2xs1");
    assert_eq!(payload.restore().unwrap(), manifold);
}

#[test]
fn tampered_checkpoint_is_rejected() {
    let dir = tempdir().unwrap();
    let manifold = Manifold::new(300, 3).unwrap();
    let metadata = CheckpointMetadata::new(&manifold, 1.0, 1.0, 1);
    let path = write_file(dir.path(), &manifold, metadata, 0).unwrap();

    let mut payload = CheckpointPayload::load(&path).unwrap();
    payload.provenance.triangulation_hash = "0".repeat(64);
    let err = payload.restore().unwrap_err();
    assert_eq!(err.code(), "checkpoint-hash-mismatch");
}

#[test]
fn missing_checkpoint_reports_path() {
    let dir = tempdir().unwrap();
    let err = CheckpointPayload::load(&dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err.code(), "checkpoint-read");
    assert!(err.info().context.contains_key("path"));
}
