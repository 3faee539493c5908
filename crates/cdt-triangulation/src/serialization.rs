use cdt_core::errors::{CdtError, ErrorInfo};
use cdt_core::provenance::SchemaVersion;
use cdt_core::VertexId;
use serde::{Deserialize, Serialize};

use crate::triangulation::FoliatedTriangulation;

const SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializes the triangulation to a compact binary representation using `bincode`.
pub fn triangulation_to_bytes(triangulation: &FoliatedTriangulation) -> Result<Vec<u8>, CdtError> {
    let serializable = SerializableTriangulation::from_triangulation(triangulation);
    bincode::serialize(&serializable)
        .map_err(|err| CdtError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a triangulation from its binary representation.
pub fn triangulation_from_bytes(bytes: &[u8]) -> Result<FoliatedTriangulation, CdtError> {
    let serializable: SerializableTriangulation = bincode::deserialize(bytes)
        .map_err(|err| CdtError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_triangulation()
}

/// Serializes the triangulation to a JSON string.
pub fn triangulation_to_json(triangulation: &FoliatedTriangulation) -> Result<String, CdtError> {
    let serializable = SerializableTriangulation::from_triangulation(triangulation);
    serde_json::to_string(&serializable)
        .map_err(|err| CdtError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a triangulation from a JSON string.
pub fn triangulation_from_json(json: &str) -> Result<FoliatedTriangulation, CdtError> {
    let serializable: SerializableTriangulation = serde_json::from_str(json)
        .map_err(|err| CdtError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_triangulation()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableTriangulation {
    schema_version: SchemaVersion,
    timeslices: u32,
    next_vertex: u64,
    vertices: Vec<(u64, u32)>,
    cells: Vec<[u64; 4]>,
}

impl SerializableTriangulation {
    fn from_triangulation(triangulation: &FoliatedTriangulation) -> Self {
        Self {
            schema_version: SCHEMA,
            timeslices: triangulation.timeslices(),
            next_vertex: triangulation.next_vertex_id().as_raw(),
            vertices: triangulation
                .vertices()
                .map(|(vertex, time)| (vertex.as_raw(), time))
                .collect(),
            cells: triangulation
                .cells()
                .map(|cell| cell.map(|vertex| vertex.as_raw()))
                .collect(),
        }
    }

    fn into_triangulation(self) -> Result<FoliatedTriangulation, CdtError> {
        if self.schema_version.major != SCHEMA.major {
            return Err(CdtError::Serde(
                ErrorInfo::new("schema-mismatch", "unsupported triangulation schema")
                    .with_context("major", self.schema_version.major.to_string()),
            ));
        }
        let triangulation = FoliatedTriangulation::from_parts(
            self.timeslices,
            self.vertices
                .into_iter()
                .map(|(raw, time)| (VertexId::from_raw(raw), time)),
            self.cells
                .into_iter()
                .map(|cell| cell.map(VertexId::from_raw)),
        )?;
        Ok(triangulation.with_next_vertex(self.next_vertex))
    }
}
