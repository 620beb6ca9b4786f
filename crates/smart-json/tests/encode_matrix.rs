//! Encoding models back to JSON text and values.

mod common;

use std::collections::BTreeMap;

use common::{Item, Order, User};
use rust_decimal::Decimal;
use serde_json::json;
use smart_json::transformer::{DateTransformer, FastTransformer, HexColorTransformer};
use smart_json::{
    impl_case_defaultable, to_object, to_serde_value, to_string, to_string_pretty, to_string_with,
    to_value, Color, Data, DataStrategy, DecodeError, EncodeError, EncodeOptions, JsonNumber, JsonValue,
    KeyEncodingStrategy, KeyedContainer, KeyedEncodingContainer, NonConformingFloat, Schema,
    SmartAny, SmartCodable, SmartNumber, WriteOptions,
};
use time::macros::datetime;
use time::OffsetDateTime;
use url::Url;

fn ann() -> User {
    User {
        name: "Ann".into(),
        age: 3,
        email: None,
        score: 3.14,
        active: true,
    }
}

#[test]
fn absent_options_are_omitted() {
    assert_eq!(
        to_string(&ann()).unwrap(),
        r#"{"name":"Ann","age":3,"score":3.14,"active":true}"#
    );
    let with_email = User {
        email: Some("a@b.c".into()),
        ..ann()
    };
    assert_eq!(
        to_string(&with_email).unwrap(),
        r#"{"name":"Ann","age":3,"email":"a@b.c","score":3.14,"active":true}"#
    );
    let list: Vec<Option<i64>> = vec![Some(1), None];
    assert_eq!(to_string(&list).unwrap(), "[1,null]");
}

#[test]
fn float_and_decimal_forms() {
    let cases: &[(f64, &str)] = &[(2.0, "2"), (-0.5, "-0.5"), (3.14, "3.14"), (1e20, "1e20")];
    for (value, text) in cases {
        assert_eq!(to_string(value).unwrap(), *text);
    }
    assert_eq!(to_string(&Decimal::new(31400, 4)).unwrap(), "3.14");
    assert_eq!(to_string(&0.1f32).unwrap(), "0.1");
}

#[test]
fn non_finite_floats() {
    let user = User {
        score: f64::INFINITY,
        ..ann()
    };
    match to_string(&user).unwrap_err() {
        EncodeError::NonConformingFloat { path, value } => {
            assert_eq!(path.to_string(), "score");
            assert_eq!(value, f64::INFINITY);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let options = EncodeOptions::builtin()
        .with_non_conforming_float(NonConformingFloat::convert_to_string("inf", "-inf", "nan"));
    let json = to_string_with(&user, options).unwrap();
    assert!(json.contains(r#""score":"inf""#), "{json}");
}

#[test]
fn pretty_sorted_output() {
    let options = EncodeOptions::builtin().pretty().with_sorted_keys(true);
    let expected = "{\n  \"active\": true,\n  \"age\": 3,\n  \"name\": \"Ann\",\n  \"score\": 3.14\n}";
    assert_eq!(to_string_with(&ann(), options).unwrap(), expected);
    assert_eq!(
        to_string_pretty(&Item { id: 1, title: "t".into() }).unwrap(),
        "{\n  \"id\": 1,\n  \"title\": \"t\"\n}"
    );
}

#[test]
fn slashes_escaped_on_request() {
    let url = Url::parse("https://a.example/x").unwrap();
    assert_eq!(to_string(&url).unwrap(), r#""https://a.example/x""#);
    let options =
        EncodeOptions::builtin().with_write_options(WriteOptions::default().with_escaped_slashes(true));
    assert_eq!(to_string_with(&url, options).unwrap(), r#""https:\/\/a.example\/x""#);
}

#[test]
fn nested_models_and_collections() {
    let order = Order {
        id: 7,
        owner: ann(),
        items: vec![Item { id: 1, title: "a".into() }],
    };
    assert_eq!(
        to_serde_value(&order).unwrap(),
        json!({
            "id": 7,
            "owner": {"name": "Ann", "age": 3, "score": 3.14, "active": true},
            "items": [{"id": 1, "title": "a"}]
        })
    );

    let mut map = BTreeMap::new();
    map.insert("b".to_owned(), Some(2));
    map.insert("a".to_owned(), None);
    map.insert("c".to_owned(), Some(1));
    assert_eq!(to_string(&map).unwrap(), r#"{"b":2,"c":1}"#);
}

#[test]
fn top_level_object_required_by_to_object() {
    let object = to_object(&ann()).unwrap();
    assert_eq!(object.keys().collect::<Vec<_>>(), ["name", "age", "score", "active"]);
    assert_eq!(
        to_object(&5i64).unwrap_err(),
        EncodeError::TopLevelNotObject { found: "Number" }
    );
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Account {
    user_name: String,
    nickname: String,
    post_count: i64,
}

impl SmartCodable for Account {
    fn schema() -> Schema {
        Schema::builder().rename("nickName", ["nick_name", "alias"]).build()
    }

    fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            user_name: c.decode("userName")?,
            nickname: c.decode("nickName")?,
            post_count: c.decode("postCount")?,
        })
    }

    fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
        c.encode("userName", &self.user_name)?;
        c.encode("nickName", &self.nickname)?;
        c.encode("postCount", &self.post_count)
    }
}

fn kim() -> Account {
    Account {
        user_name: "kim".into(),
        nickname: "k".into(),
        post_count: 2,
    }
}

#[test]
fn key_strategies_on_output() {
    let snake = EncodeOptions::builtin().with_key_strategy(KeyEncodingStrategy::ToSnakeCase);
    assert_eq!(
        to_string_with(&kim(), snake).unwrap(),
        r#"{"user_name":"kim","nick_name":"k","post_count":2}"#
    );
    let upper = EncodeOptions::builtin().with_key_strategy(KeyEncodingStrategy::FirstLetterUpper);
    assert_eq!(
        to_string_with(&kim(), upper).unwrap(),
        r#"{"UserName":"kim","NickName":"k","PostCount":2}"#
    );
}

#[test]
fn mapped_keys_use_first_alternate() {
    assert_eq!(
        to_string(&kim()).unwrap(),
        r#"{"userName":"kim","nickName":"k","postCount":2}"#
    );
    let mapped = EncodeOptions::builtin()
        .with_mapped_keys(true)
        .with_key_strategy(KeyEncodingStrategy::FirstLetterUpper);
    assert_eq!(
        to_string_with(&kim(), mapped).unwrap(),
        r#"{"UserName":"kim","nick_name":"k","PostCount":2}"#
    );
}

// ---------------------------------------------------------------------------
// Schema on output
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Badge {
    tint: Color,
    issued: Option<OffsetDateTime>,
    tags: Vec<String>,
    cache: String,
}

impl SmartCodable for Badge {
    fn schema() -> Schema {
        Schema::builder()
            .transform("tint", HexColorTransformer::new("0x"))
            .transform("issued", DateTransformer::formatted("[year]-[month]-[day]"))
            .transform(
                "tags",
                FastTransformer::new(
                    |value: &JsonValue| {
                        value
                            .as_str()
                            .map(|s| s.split(',').map(str::to_owned).collect::<Vec<String>>())
                    },
                    |tags: &Vec<String>| Some(JsonValue::from(tags.join(","))),
                ),
            )
            .ignore("cache")
            .build()
    }

    fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            tint: c.decode("tint")?,
            issued: c.decode("issued")?,
            tags: c.decode("tags")?,
            cache: c.decode("cache")?,
        })
    }

    fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
        c.encode("tint", &self.tint)?;
        c.encode("issued", &self.issued)?;
        c.encode("tags", &self.tags)?;
        c.encode("cache", &self.cache)
    }
}

#[test]
fn transformers_and_ignored_fields() {
    let badge = Badge {
        tint: Color::rgb(0xFF, 0x88, 0x00),
        issued: Some(datetime!(1990-05-17 0:00 UTC)),
        tags: vec!["x".into(), "y".into()],
        cache: "scratch".into(),
    };
    assert_eq!(
        to_string(&badge).unwrap(),
        r#"{"tint":"0xFF8800","issued":"1990-05-17","tags":"x,y"}"#
    );
    let bare = Badge::default();
    assert_eq!(to_string(&bare).unwrap(), r#"{"tint":"0x000000","tags":""}"#);
}

#[derive(Debug, Default)]
struct Meta {
    created_by: String,
}

impl SmartCodable for Meta {
    fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            created_by: c.decode("createdBy")?,
        })
    }

    fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
        c.encode("createdBy", &self.created_by)
    }
}

#[derive(Debug, Default)]
struct Page {
    title: String,
    meta: Meta,
}

impl SmartCodable for Page {
    fn schema() -> Schema {
        Schema::builder().flatten("meta").build()
    }

    fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            title: c.decode("title")?,
            meta: c.decode("meta")?,
        })
    }

    fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
        c.encode("title", &self.title)?;
        c.encode("meta", &self.meta)?;
        c.insert("version", JsonValue::from(2));
        Ok(())
    }
}

#[test]
fn flattened_fields_merge_into_parent() {
    let page = Page {
        title: "Notes".into(),
        meta: Meta {
            created_by: "lee".into(),
        },
    };
    assert_eq!(
        to_string(&page).unwrap(),
        r#"{"title":"Notes","createdBy":"lee","version":2}"#
    );
}

// ---------------------------------------------------------------------------
// Special types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl_case_defaultable!(Gender: String {
    Male => "male",
    Female => "female",
    Unknown => "unknown",
});

#[test]
fn special_types_on_output() {
    assert_eq!(to_string(&vec![Gender::Female, Gender::Male]).unwrap(), r#"["female","male"]"#);
    assert_eq!(
        to_string(&datetime!(2024-03-01 12:00:00 UTC)).unwrap(),
        r#""2024-03-01T12:00:00Z""#
    );
    assert_eq!(to_string(&Data(b"hi?".to_vec())).unwrap(), r#""aGk/""#);
    let url_safe = EncodeOptions::builtin().with_data_strategy(DataStrategy::Base64UrlSafe);
    assert_eq!(to_string_with(&Data(b"hi?".to_vec()), url_safe).unwrap(), r#""aGk_""#);
    assert_eq!(to_string(&Color::rgba(1, 2, 3, 4)).unwrap(), r##""#01020304""##);

    let any = SmartAny::Array(vec![
        SmartAny::Number(SmartNumber::U8(7)),
        SmartAny::Number(SmartNumber::F64(0.5)),
        SmartAny::Null,
    ]);
    let expected = JsonValue::Array(vec![
        JsonValue::from(7),
        JsonValue::Number(JsonNumber::parse("0.5").unwrap()),
        JsonValue::Null,
    ]);
    assert_eq!(to_value(&any).unwrap(), expected);
}

#[test]
fn to_json_string_shortcut() {
    let item = Item { id: 2, title: "b".into() };
    assert_eq!(item.to_json_string().unwrap(), r#"{"id":2,"title":"b"}"#);
}
