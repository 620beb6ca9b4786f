//! Fault-tolerant JSON decoding into typed models.
//!
//! Decoding never gives up on a field that has a sensible fallback: a
//! missing key, a `null` or a value of the wrong shape is replaced by the
//! field's value in the model's `Default` instance (or by the type's zero
//! value), and the anomaly is reported through the
//! [sentinel](smart_json_sentinel) instead of failing the call. Only
//! malformed JSON and a root that cannot be decoded at all are errors.
//!
//! ```
//! use smart_json::{DecodeError, EncodeError, KeyedContainer, KeyedEncodingContainer, SmartCodable};
//!
//! #[derive(Debug, Default)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//! }
//!
//! impl SmartCodable for Point {
//!     fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
//!         Ok(Self { x: c.decode("x")?, y: c.decode("y")? })
//!     }
//!
//!     fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
//!         c.encode("x", &self.x)?;
//!         c.encode("y", &self.y)
//!     }
//! }
//!
//! let p: Point = smart_json::from_str(r#"{"x": "1.5", "y": null}"#).unwrap();
//! assert_eq!((p.x, p.y), (1.5, 0.0));
//! assert_eq!(smart_json::to_string(&p).unwrap(), r#"{"x":1.5,"y":0}"#);
//! ```

mod any;
mod cache;
pub mod config;
mod data;
mod date;
mod decoder;
mod encoder;
mod error;
pub mod key;
mod model;
mod names;
mod schema;
pub mod transformer;

pub use any::{SmartAny, SmartNumber};
pub use config::{
    install_global_options, DataStrategy, DateDecodingStrategy, DateEncodingStrategy, DecodeOptions,
    EncodeOptions, KeyDecodingStrategy, KeyEncodingStrategy, NonConformingFloat,
};
pub use data::{Color, Data};
pub use decoder::{Decodable, Decoder, KeyedContainer, SingleValueContainer, UnkeyedContainer};
pub use encoder::{Encodable, Encoder, KeyedEncodingContainer};
pub use error::{DecodeError, EncodeError};
#[doc(hidden)]
pub use model::{decode_case, encode_case};
pub use model::{SmartCaseDefaultable, SmartCodable};
pub use schema::{Schema, SchemaBuilder};
pub use transformer::ValueTransformer;

pub use smart_json_sentinel::{
    clear_log_handler, debug_level, set_debug_level, set_log_handler, DebugLevel,
};
pub use smart_json_value::{JsonNumber, JsonObject, JsonValue, ParseError, ParseErrorKind, WriteOptions};

use std::borrow::Cow;

use smart_json_path::extract;

pub(crate) fn value_to_string(value: &JsonValue) -> String {
    smart_json_value::to_string(value, WriteOptions::default())
}

/// Narrows `value` to the options' designated path, if any.
fn designated<'a>(value: &'a JsonValue, options: &DecodeOptions) -> Result<Cow<'a, JsonValue>, DecodeError> {
    match options.designated_path.as_deref() {
        None | Some("") => Ok(Cow::Borrowed(value)),
        Some(path) => extract(value, path)
            .map(Cow::Owned)
            .ok_or_else(|| DecodeError::DesignatedPathNotFound(path.to_owned())),
    }
}

pub fn from_value_with<T: Decodable>(value: &JsonValue, options: DecodeOptions) -> Result<T, DecodeError> {
    let target = designated(value, &options)?;
    Decoder::new(options).decode_root(&target)
}

pub fn from_value<T: Decodable>(value: &JsonValue) -> Result<T, DecodeError> {
    from_value_with(value, DecodeOptions::default())
}

pub fn from_slice_with<T: Decodable>(bytes: &[u8], options: DecodeOptions) -> Result<T, DecodeError> {
    let value = smart_json_value::parse(bytes)?;
    from_value_with(&value, options)
}

pub fn from_slice<T: Decodable>(bytes: &[u8]) -> Result<T, DecodeError> {
    from_slice_with(bytes, DecodeOptions::default())
}

pub fn from_str_with<T: Decodable>(json: &str, options: DecodeOptions) -> Result<T, DecodeError> {
    from_slice_with(json.as_bytes(), options)
}

pub fn from_str<T: Decodable>(json: &str) -> Result<T, DecodeError> {
    from_str_with(json, DecodeOptions::default())
}

/// Decodes the subtree at a dotted `path` (`"data.items.0"`).
pub fn from_str_at<T: Decodable>(json: &str, path: &str) -> Result<T, DecodeError> {
    from_str_with(json, DecodeOptions::default().with_designated_path(path))
}

/// Decodes a `serde_json` value, for payloads that arrive already parsed.
pub fn from_serde_value<T: Decodable>(value: &serde_json::Value) -> Result<T, DecodeError> {
    from_value(&JsonValue::from(value.clone()))
}

/// Merges `json` into `model`: fields present in the payload are decoded,
/// the others keep their current value.
pub fn update<T: SmartCodable>(model: &mut T, json: &str) -> Result<(), DecodeError> {
    let value = smart_json_value::parse_str(json)?;
    update_with_value(model, &value, DecodeOptions::default())
}

pub fn update_with_value<T: SmartCodable>(
    model: &mut T,
    value: &JsonValue,
    options: DecodeOptions,
) -> Result<(), DecodeError> {
    let target = designated(value, &options)?;
    let seed = encoder::raw_fields(model).map_err(|e| DecodeError::DataCorrupted {
        path: smart_json_path::CodingPath::new(),
        message: format!("current model cannot be captured: {e}"),
    })?;
    *model = Decoder::new(options).decode_root_seeded(&target, seed)?;
    Ok(())
}

pub fn to_value_with<T: Encodable + ?Sized>(value: &T, options: EncodeOptions) -> Result<JsonValue, EncodeError> {
    Encoder::new(options).encode(value)
}

pub fn to_value<T: Encodable + ?Sized>(value: &T) -> Result<JsonValue, EncodeError> {
    to_value_with(value, EncodeOptions::default())
}

/// Like [`to_value`], for callers that need an object at the top.
pub fn to_object<T: Encodable + ?Sized>(value: &T) -> Result<JsonObject, EncodeError> {
    match to_value(value)? {
        JsonValue::Object(object) => Ok(object),
        other => Err(EncodeError::TopLevelNotObject {
            found: other.kind_name(),
        }),
    }
}

pub fn to_vec_with<T: Encodable + ?Sized>(value: &T, options: EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let write = options.write;
    let json = to_value_with(value, options)?;
    Ok(smart_json_value::to_vec(&json, write))
}

pub fn to_vec<T: Encodable + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    to_vec_with(value, EncodeOptions::default())
}

pub fn to_string_with<T: Encodable + ?Sized>(value: &T, options: EncodeOptions) -> Result<String, EncodeError> {
    let write = options.write;
    let json = to_value_with(value, options)?;
    Ok(smart_json_value::to_string(&json, write))
}

pub fn to_string<T: Encodable + ?Sized>(value: &T) -> Result<String, EncodeError> {
    to_string_with(value, EncodeOptions::default())
}

pub fn to_string_pretty<T: Encodable + ?Sized>(value: &T) -> Result<String, EncodeError> {
    to_string_with(value, EncodeOptions::default().pretty())
}

pub fn to_serde_value<T: Encodable + ?Sized>(value: &T) -> Result<serde_json::Value, EncodeError> {
    to_value(value).map(|json| serde_json::Value::from(&json))
}
