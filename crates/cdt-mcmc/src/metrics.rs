use std::fs::File;
use std::io::Write;
use std::path::Path;

use cdt_triangulation::Geometry;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Per-pass sample stored for CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassSample {
    /// Pass number, starting at 1.
    pub pass: usize,
    /// Geometry after the pass.
    pub geometry: Geometry,
    /// Proposals made during the pass.
    pub proposed: u64,
    /// Proposals accepted and queued.
    pub accepted: u64,
    /// Queued moves that succeeded.
    pub succeeded: u64,
    /// Queued moves that failed.
    pub failed: u64,
    /// Bulk action of the geometry after the pass.
    pub action: f64,
    /// Canonical hash of the triangulation after the pass.
    pub triangulation_hash: String,
}

/// Collects pass samples and counts distinct triangulations visited.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    samples: Vec<PassSample>,
    unique_states: IndexSet<String>,
}

impl MetricsRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pass sample.
    pub fn push_sample(&mut self, sample: PassSample) {
        self.unique_states.insert(sample.triangulation_hash.clone());
        self.samples.push(sample);
    }

    /// Recorded samples in pass order.
    pub fn samples(&self) -> &[PassSample] {
        &self.samples
    }

    /// Number of distinct triangulations seen at pass boundaries.
    pub fn unique_states(&self) -> usize {
        self.unique_states.len()
    }

    /// Writes the samples as CSV.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        writeln!(
            file,
            "pass,n3,n3_31,n3_22,n3_13,n2,n1_tl,n1_sl,n0,proposed,accepted,succeeded,failed,action,hash"
        )?;
        for sample in &self.samples {
            let g = &sample.geometry;
            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{:.6},{}",
                sample.pass,
                g.n3,
                g.n3_31,
                g.n3_22,
                g.n3_13,
                g.n2,
                g.n1_tl,
                g.n1_sl,
                g.n0,
                sample.proposed,
                sample.accepted,
                sample.succeeded,
                sample.failed,
                sample.action,
                sample.triangulation_hash
            )?;
        }
        Ok(())
    }
}
