use cdt_triangulation::{
    canonical_hash, triangulation_from_bytes, triangulation_from_json, triangulation_to_bytes,
    triangulation_to_json, FoliatedTriangulation,
};

#[test]
fn json_round_trip_preserves_hash() {
    let triangulation = FoliatedTriangulation::new(300, 3).unwrap();
    let json = triangulation_to_json(&triangulation).unwrap();
    let restored = triangulation_from_json(&json).unwrap();
    assert_eq!(canonical_hash(&triangulation), canonical_hash(&restored));
    assert_eq!(restored, triangulation);
}

#[test]
fn bytes_round_trip_preserves_hash() {
    let triangulation = FoliatedTriangulation::new(300, 3).unwrap();
    let bytes = triangulation_to_bytes(&triangulation).unwrap();
    let restored = triangulation_from_bytes(&bytes).unwrap();
    assert_eq!(canonical_hash(&triangulation), canonical_hash(&restored));
}

#[test]
fn corrupted_json_is_reported() {
    let err = triangulation_from_json("{\"timeslices\": 3}").unwrap_err();
    assert_eq!(err.info().code, "deserialize-json");
}
