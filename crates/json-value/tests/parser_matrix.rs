//! Parser and writer behaviour over whole documents.

use proptest::prelude::*;
use smart_json_value::{
    parse, parse_str, to_string, JsonNumber, JsonObject, JsonValue, ParseErrorKind, WriteOptions,
};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

#[test]
fn error_offsets_matrix() {
    let cases: &[(&str, ParseErrorKind, usize)] = &[
        ("", ParseErrorKind::UnexpectedEndOfFile, 0),
        ("   ", ParseErrorKind::UnexpectedEndOfFile, 3),
        ("not json", ParseErrorKind::UnexpectedCharacter(b'n'), 0),
        ("[1 2]", ParseErrorKind::UnexpectedCharacter(b'2'), 3),
        ("{\"a\" 1}", ParseErrorKind::UnexpectedCharacter(b'1'), 5),
        ("{a:1}", ParseErrorKind::UnexpectedCharacter(b'a'), 1),
        ("\"abc", ParseErrorKind::UnexpectedEndOfString, 4),
        ("[012]", ParseErrorKind::NumberWithLeadingZero, 1),
        ("[1.]", ParseErrorKind::InvalidNumber, 3),
        ("[-]", ParseErrorKind::InvalidNumber, 2),
        ("[1] [2]", ParseErrorKind::TrailingData, 4),
        ("\"\\u12G4\"", ParseErrorKind::InvalidUnicodeEscape, 5),
        ("\"a\tb\"", ParseErrorKind::UnescapedControlCharacterInString(b'\t'), 2),
    ];
    for (input, kind, offset) in cases {
        let err = parse_str(input).unwrap_err();
        assert_eq!((err.kind, err.offset), (*kind, *offset), "input: {input:?}");
    }
}

#[test]
fn invalid_utf8_in_string() {
    let err = parse(b"[\"\xff\"]").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidUtf8);
    assert_eq!(err.offset, 1);
}

#[test]
fn deep_nesting_fails_with_depth_error_not_overflow() {
    let deep = format!("{}{}", "[".repeat(513), "]".repeat(513));
    let err = parse_str(&deep).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TooManyNestedArraysOrDictionaries);

    let objects = format!("{}1{}", "{\"a\":".repeat(600), "}".repeat(600));
    let err = parse_str(&objects).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TooManyNestedArraysOrDictionaries);
}

#[test]
fn error_display_mentions_offset() {
    let err = parse_str("[1,x]").unwrap_err();
    assert_eq!(err.to_string(), "unexpected character 'x' at byte 3");
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

#[test]
fn numbers_keep_their_text() {
    let v = parse_str("[3.1400, 12345678901234567890, -0, 1E+2]").unwrap();
    let texts: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n.as_number().unwrap().as_str())
        .collect();
    assert_eq!(texts, vec!["3.1400", "12345678901234567890", "-0", "1E+2"]);
    assert_eq!(
        to_string(&v, WriteOptions::default()),
        "[3.1400,12345678901234567890,-0,1E+2]"
    );
}

#[test]
fn values_compare_numbers_by_value_and_objects_by_content() {
    let a = parse_str(r#"{"x": 1.50, "y": [2]}"#).unwrap();
    let b = parse_str(r#"{"y": [2.0], "x": 1.5}"#).unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

fn arb_value() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i64>().prop_map(JsonValue::from),
        any::<f64>()
            .prop_filter_map("finite", JsonNumber::from_f64)
            .prop_map(JsonValue::Number),
        "\\PC*".prop_map(JsonValue::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(JsonValue::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                .prop_map(|entries| JsonValue::Object(entries.into_iter().collect::<JsonObject>())),
        ]
    })
}

proptest! {
    #[test]
    fn write_then_parse_is_identity(value in arb_value()) {
        let compact = to_string(&value, WriteOptions::default());
        prop_assert_eq!(parse_str(&compact).unwrap(), value.clone());
        let pretty = to_string(&value, WriteOptions::pretty().with_sorted_keys(true));
        prop_assert_eq!(parse_str(&pretty).unwrap(), value);
    }
}
