//! Per-field value transformers.
//!
//! A transformer owns the JSON representation of one field: on decode it
//! turns the raw [`JsonValue`] into the field's type, on encode it turns the
//! field back into JSON. Transformers are declared in a model's
//! [`Schema`](crate::Schema) and take precedence over the field type's own
//! decoding.

use std::any::Any;
use std::marker::PhantomData;

use smart_json_value::JsonValue;
use time::OffsetDateTime;
use url::Url;

use crate::config::{DataStrategy, DateDecodingStrategy, DateEncodingStrategy};
use crate::data::{Color, Data};

pub trait ValueTransformer: Send + Sync + 'static {
    type Object: 'static;

    fn transform_from_json(&self, value: &JsonValue) -> Option<Self::Object>;

    fn transform_to_json(&self, object: &Self::Object) -> Option<JsonValue>;
}

/// Object-safe face of [`ValueTransformer`], stored in schemas.
pub(crate) trait ErasedTransformer: Send + Sync {
    fn decode_any(&self, value: &JsonValue) -> Option<Box<dyn Any>>;

    /// `None` when `value` is not this transformer's object type (or an
    /// `Option` of it), or when the transformer declines it.
    fn encode_any(&self, value: &dyn Any) -> Option<JsonValue>;
}

impl<T: ValueTransformer> ErasedTransformer for T {
    fn decode_any(&self, value: &JsonValue) -> Option<Box<dyn Any>> {
        self.transform_from_json(value)
            .map(|object| Box::new(object) as Box<dyn Any>)
    }

    fn encode_any(&self, value: &dyn Any) -> Option<JsonValue> {
        if let Some(object) = value.downcast_ref::<T::Object>() {
            return self.transform_to_json(object);
        }
        match value.downcast_ref::<Option<T::Object>>() {
            Some(Some(object)) => self.transform_to_json(object),
            _ => None,
        }
    }
}

/// Dates with their own strategy, independent of the call's options.
pub struct DateTransformer {
    decoding: DateDecodingStrategy,
    encoding: DateEncodingStrategy,
}

impl DateTransformer {
    pub fn new(decoding: DateDecodingStrategy, encoding: DateEncodingStrategy) -> Self {
        Self { decoding, encoding }
    }

    /// Same `time` format description both ways.
    pub fn formatted(format: impl Into<String>) -> Self {
        let format = format.into();
        Self::new(
            DateDecodingStrategy::Formatted(format.clone()),
            DateEncodingStrategy::Formatted(format),
        )
    }

    pub fn seconds_since_1970() -> Self {
        Self::new(
            DateDecodingStrategy::SecondsSince1970,
            DateEncodingStrategy::SecondsSince1970,
        )
    }

    pub fn milliseconds_since_1970() -> Self {
        Self::new(
            DateDecodingStrategy::MillisecondsSince1970,
            DateEncodingStrategy::MillisecondsSince1970,
        )
    }

    pub fn iso8601() -> Self {
        Self::new(DateDecodingStrategy::Iso8601, DateEncodingStrategy::Iso8601)
    }
}

impl ValueTransformer for DateTransformer {
    type Object = OffsetDateTime;

    fn transform_from_json(&self, value: &JsonValue) -> Option<OffsetDateTime> {
        self.decoding.decode(value)
    }

    fn transform_to_json(&self, object: &OffsetDateTime) -> Option<JsonValue> {
        self.encoding.encode(object)
    }
}

/// Hex colour strings (`#RGB`, `#RRGGBB`, `#RRGGBBAA`, `#` or `0x`).
#[derive(Debug, Clone)]
pub struct HexColorTransformer {
    prefix: String,
}

impl Default for HexColorTransformer {
    fn default() -> Self {
        Self::new("#")
    }
}

impl HexColorTransformer {
    /// `prefix` is written on encode; any accepted prefix is read on decode.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ValueTransformer for HexColorTransformer {
    type Object = Color;

    fn transform_from_json(&self, value: &JsonValue) -> Option<Color> {
        value.as_str().and_then(Color::from_hex)
    }

    fn transform_to_json(&self, object: &Color) -> Option<JsonValue> {
        Some(JsonValue::String(object.to_hex(&self.prefix)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataTransformer {
    strategy: DataStrategy,
}

impl DataTransformer {
    pub fn new(strategy: DataStrategy) -> Self {
        Self { strategy }
    }
}

impl ValueTransformer for DataTransformer {
    type Object = Data;

    fn transform_from_json(&self, value: &JsonValue) -> Option<Data> {
        value
            .as_str()
            .and_then(|text| Data::from_base64(text, self.strategy))
    }

    fn transform_to_json(&self, object: &Data) -> Option<JsonValue> {
        Some(JsonValue::String(object.to_base64(self.strategy)))
    }
}

/// URLs, optionally completing relative strings with a prefix.
#[derive(Debug, Clone, Default)]
pub struct UrlTransformer {
    prefix: Option<String>,
}

impl UrlTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strings not already starting with `prefix` get it prepended; the
    /// prefix is kept when encoding.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl ValueTransformer for UrlTransformer {
    type Object = Url;

    fn transform_from_json(&self, value: &JsonValue) -> Option<Url> {
        let text = value.as_str()?.trim();
        if text.is_empty() {
            return None;
        }
        match &self.prefix {
            Some(prefix) if !text.starts_with(prefix.as_str()) => {
                Url::parse(&format!("{prefix}{text}")).ok()
            }
            _ => Url::parse(text).ok(),
        }
    }

    fn transform_to_json(&self, object: &Url) -> Option<JsonValue> {
        Some(JsonValue::String(object.as_str().to_owned()))
    }
}

/// Transformer from a pair of closures.
pub struct FastTransformer<O, D, E> {
    from_json: D,
    to_json: E,
    _object: PhantomData<fn() -> O>,
}

impl<O, D, E> FastTransformer<O, D, E>
where
    D: Fn(&JsonValue) -> Option<O>,
    E: Fn(&O) -> Option<JsonValue>,
{
    pub fn new(from_json: D, to_json: E) -> Self {
        Self {
            from_json,
            to_json,
            _object: PhantomData,
        }
    }
}

impl<O, D, E> ValueTransformer for FastTransformer<O, D, E>
where
    O: 'static,
    D: Fn(&JsonValue) -> Option<O> + Send + Sync + 'static,
    E: Fn(&O) -> Option<JsonValue> + Send + Sync + 'static,
{
    type Object = O;

    fn transform_from_json(&self, value: &JsonValue) -> Option<O> {
        (self.from_json)(value)
    }

    fn transform_to_json(&self, object: &O) -> Option<JsonValue> {
        (self.to_json)(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_prefix_completes_relative_paths() {
        let t = UrlTransformer::with_prefix("https://cdn.example.com/");
        let url = t
            .transform_from_json(&JsonValue::from("img/a.png"))
            .unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/img/a.png");
        let url = t
            .transform_from_json(&JsonValue::from("https://cdn.example.com/b.png"))
            .unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/b.png");
        assert!(UrlTransformer::new()
            .transform_from_json(&JsonValue::from("not a url"))
            .is_none());
    }

    #[test]
    fn erased_transformer_accepts_optional_objects() {
        let t = HexColorTransformer::new("0x");
        let plain: &dyn Any = &Color::rgb(255, 0, 0);
        assert_eq!(t.encode_any(plain), Some(JsonValue::from("0xFF0000")));
        let wrapped: &dyn Any = &Some(Color::rgb(0, 255, 0));
        assert_eq!(t.encode_any(wrapped), Some(JsonValue::from("0x00FF00")));
        let other: &dyn Any = &42i64;
        assert_eq!(t.encode_any(other), None);
    }

    #[test]
    fn fast_transformer_wraps_closures() {
        let t = FastTransformer::new(
            |v: &JsonValue| v.as_str().map(|s| s.to_uppercase()),
            |s: &String| Some(JsonValue::from(s.to_lowercase())),
        );
        assert_eq!(
            t.transform_from_json(&JsonValue::from("abc")),
            Some("ABC".to_string())
        );
        assert_eq!(
            t.transform_to_json(&"ABC".to_string()),
            Some(JsonValue::from("abc"))
        );
    }
}
