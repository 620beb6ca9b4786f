//! Turns typed values back into a [`JsonValue`] tree.

mod encodable;
mod keyed;

pub use encodable::Encodable;
pub use keyed::KeyedEncodingContainer;

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use smart_json_path::{CodingKey, CodingPath};
use smart_json_value::{JsonNumber, JsonObject, JsonValue};

use crate::config::{EncodeOptions, NonConformingFloat};
use crate::error::EncodeError;
use crate::model::SmartCodable;
use crate::schema::Schema;

pub struct Encoder {
    options: EncodeOptions,
    raw: bool,
    path: CodingPath,
    schemas: HashMap<TypeId, Arc<Schema>>,
}

impl Encoder {
    pub fn new(options: EncodeOptions) -> Self {
        Self {
            options,
            raw: false,
            path: CodingPath::new(),
            schemas: HashMap::new(),
        }
    }

    /// Field names as declared, no key strategy, no transformers, ignored
    /// fields included, non-finite floats as the raw tokens. Used to capture
    /// model defaults; the decoder reads it back in restoring mode.
    pub(crate) fn raw() -> Self {
        let options = EncodeOptions::builtin().with_non_conforming_float(NonConformingFloat::raw());
        Self {
            raw: true,
            ..Self::new(options)
        }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    pub fn encode<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<JsonValue, EncodeError> {
        value.encode_value(self)
    }

    pub(crate) fn nested<R>(&mut self, key: CodingKey, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(key);
        let result = f(self);
        self.path.pop();
        result
    }

    /// Finite floats as numbers (integral values without a fraction);
    /// infinities and NaN per the non-conforming float strategy.
    pub fn encode_f64(&self, value: f64) -> Result<JsonValue, EncodeError> {
        if value.is_finite() {
            if value.fract() == 0.0 && value.abs() < 1e15 {
                return Ok(JsonValue::Number(JsonNumber::from(value as i64)));
            }
            if let Some(n) = JsonNumber::from_f64(value) {
                return Ok(JsonValue::Number(n));
            }
        }
        self.non_conforming(value)
    }

    pub fn encode_f32(&self, value: f32) -> Result<JsonValue, EncodeError> {
        if value.is_finite() {
            if value.fract() == 0.0 && value.abs() < 1e15 {
                return Ok(JsonValue::Number(JsonNumber::from(value as i64)));
            }
            if let Some(n) = JsonNumber::from_f32(value) {
                return Ok(JsonValue::Number(n));
            }
        }
        self.non_conforming(f64::from(value))
    }

    fn non_conforming(&self, value: f64) -> Result<JsonValue, EncodeError> {
        match self.options.non_conforming_float.encode_token(value) {
            Some(token) => Ok(JsonValue::String(token.to_owned())),
            None => Err(EncodeError::NonConformingFloat {
                path: self.path.clone(),
                value,
            }),
        }
    }

    pub fn invalid(&self, message: impl Into<String>) -> EncodeError {
        EncodeError::InvalidValue {
            path: self.path.clone(),
            message: message.into(),
        }
    }

    fn schema_of<T: SmartCodable>(&mut self) -> Arc<Schema> {
        self.schemas
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(T::schema()))
            .clone()
    }

    pub(crate) fn encode_model<T: SmartCodable>(&mut self, model: &T) -> Result<JsonValue, EncodeError> {
        let schema = self.schema_of::<T>();
        let mut container = KeyedEncodingContainer::new(self, schema);
        model.encode(&mut container)?;
        Ok(JsonValue::Object(container.into_object()))
    }
}

/// Fields of `model` in raw form, keyed by declared field name.
pub(crate) fn raw_fields<T: SmartCodable>(model: &T) -> Result<JsonObject, EncodeError> {
    match Encoder::raw().encode_model(model)? {
        JsonValue::Object(fields) => Ok(fields),
        other => Err(EncodeError::TopLevelNotObject {
            found: other.kind_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_forms() {
        let encoder = Encoder::new(EncodeOptions::builtin());
        assert_eq!(encoder.encode_f64(3.14).unwrap(), JsonValue::Number(JsonNumber::parse("3.14").unwrap()));
        assert_eq!(encoder.encode_f64(30.0).unwrap().as_number().unwrap().as_str(), "30");
        assert_eq!(encoder.encode_f32(0.1).unwrap().as_number().unwrap().as_str(), "0.1");
        assert!(matches!(
            encoder.encode_f64(f64::NAN),
            Err(EncodeError::NonConformingFloat { .. })
        ));

        let lenient = Encoder::new(
            EncodeOptions::builtin()
                .with_non_conforming_float(NonConformingFloat::convert_to_string("+Inf", "-Inf", "NaN")),
        );
        assert_eq!(lenient.encode_f64(f64::INFINITY).unwrap(), JsonValue::from("+Inf"));
        assert_eq!(lenient.encode_f32(f32::NAN).unwrap(), JsonValue::from("NaN"));
    }
}
