use cdt_core::provenance::{RunProvenance, SchemaVersion};
use cdt_core::{Couplings, MoveType, VertexId};

#[test]
fn provenance_round_trip_json() {
    let provenance = RunProvenance {
        triangulation_hash: "abc123".into(),
        seed: 99,
        created_at: "2026-10-16T00:00:00Z".into(),
        tool_versions: [("cdt-core".into(), "0.1.0".into())].into_iter().collect(),
    };

    let json = serde_json::to_string_pretty(&provenance).expect("serialize");
    let decoded: RunProvenance = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded, provenance);
    assert_eq!(SchemaVersion::default(), SchemaVersion::new(1, 0, 0));
}

#[test]
fn couplings_round_trip_json() {
    let couplings = Couplings::new(0.6, 1.1, 0.1);
    let json = serde_json::to_string(&couplings).expect("serialize");
    let decoded: Couplings = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, couplings);
    assert!(decoded.is_physical());
    assert!(!Couplings::new(-1.0, 1.0, 1.0).is_physical());
}

#[test]
fn move_types_use_stable_labels() {
    let json = serde_json::to_string(&MoveType::TwoThree).unwrap();
    assert_eq!(json, "\"two-three\"");
    for (idx, move_type) in MoveType::ALL.iter().enumerate() {
        assert_eq!(move_type.index(), idx);
    }
    assert!(!MoveType::ERGODIC.contains(&MoveType::Null));
    assert_eq!(MoveType::SixTwo.to_string(), "(6,2)");
    assert_eq!(VertexId::from_raw(5).as_raw(), 5);
}
