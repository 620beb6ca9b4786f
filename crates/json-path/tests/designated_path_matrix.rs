//! Designated-path extraction over realistic payloads.

use serde_json::json;
use smart_json_path::{extract, find, parse_path};
use smart_json_value::JsonValue;

fn doc() -> JsonValue {
    JsonValue::from(json!({
        "code": 0,
        "result": {
            "data": [
                {"name": "alpha", "tags": ["x", "y"]},
                {"name": "beta"}
            ],
            "0": "numeric key",
            "embedded": "{\"inner\": {\"deep\": [10, 20]}}"
        }
    }))
}

#[test]
fn numeric_segments_index_arrays() {
    let found = extract(&doc(), "result.data.0.name").unwrap();
    assert_eq!(found.as_str(), Some("alpha"));
    let found = extract(&doc(), "result.data.0.tags.1").unwrap();
    assert_eq!(found.as_str(), Some("y"));
}

#[test]
fn numeric_segment_on_object_is_a_key() {
    let found = extract(&doc(), "result.0").unwrap();
    assert_eq!(found.as_str(), Some("numeric key"));
}

#[test]
fn invalid_segments_yield_nothing() {
    assert!(extract(&doc(), "result.data.5.name").is_none());
    assert!(extract(&doc(), "result.data.first").is_none());
    assert!(extract(&doc(), "code.value").is_none());
    assert!(extract(&doc(), "result..data").is_none());
    assert!(extract(&doc(), "missing").is_none());
}

#[test]
fn embedded_json_strings_are_entered() {
    let found = extract(&doc(), "result.embedded.inner.deep.1").unwrap();
    assert_eq!(found.as_i64(), Some(20));
}

#[test]
fn empty_path_returns_whole_document() {
    assert_eq!(extract(&doc(), "").unwrap(), doc());
}

#[test]
fn borrowing_find_does_not_parse_strings() {
    let d = doc();
    let segments = parse_path("result.data.1.name").unwrap();
    assert_eq!(find(&d, &segments).and_then(JsonValue::as_str), Some("beta"));
    let segments = parse_path("result.embedded.inner").unwrap();
    assert!(find(&d, &segments).is_none());
}
