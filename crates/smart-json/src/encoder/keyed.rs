use std::any::Any;
use std::sync::Arc;

use smart_json_path::CodingKey;
use smart_json_value::{JsonObject, JsonValue};

use super::{Encodable, Encoder};
use crate::error::EncodeError;
use crate::schema::Schema;

/// Field sink for one JSON object, handed to
/// [`SmartCodable::encode`](crate::SmartCodable::encode).
pub struct KeyedEncodingContainer<'e> {
    encoder: &'e mut Encoder,
    schema: Arc<Schema>,
    object: JsonObject,
}

impl<'e> KeyedEncodingContainer<'e> {
    pub(crate) fn new(encoder: &'e mut Encoder, schema: Arc<Schema>) -> Self {
        Self {
            encoder,
            schema,
            object: JsonObject::new(),
        }
    }

    pub(crate) fn into_object(self) -> JsonObject {
        self.object
    }

    pub fn encoder(&mut self) -> &mut Encoder {
        &mut *self.encoder
    }

    /// Key written for `field`: its first alternate when mapped keys are
    /// requested, otherwise the field name run through the key strategy.
    fn output_key(&self, field: &str) -> String {
        if self.encoder.is_raw() {
            return field.to_owned();
        }
        let options = self.encoder.options();
        if options.use_mapped_keys {
            if let Some(first) = self.schema.alternates(field).first() {
                return first.clone();
            }
        }
        options.key_strategy.apply(field).into_owned()
    }

    /// Writes `value` under `field`. `None` options are omitted, ignored
    /// fields skipped and flattened fields merged into this object.
    pub fn encode<F: Encodable + Any>(&mut self, field: &str, value: &F) -> Result<(), EncodeError> {
        let raw = self.encoder.is_raw();
        if value.is_absent() || (!raw && self.schema.is_ignored(field)) {
            return Ok(());
        }

        if !raw {
            if let Some(transformer) = self.schema.transformer(field) {
                if let Some(json) = transformer.encode_any(value as &dyn Any) {
                    let key = self.output_key(field);
                    self.object.insert(key, json);
                    return Ok(());
                }
            }
        }

        let json = self
            .encoder
            .nested(CodingKey::from(field), |e| value.encode_value(e))?;
        match json {
            JsonValue::Object(fields) if self.schema.is_flattened(field) => self.object.extend(fields),
            json => {
                let key = self.output_key(field);
                self.object.insert(key, json);
            }
        }
        Ok(())
    }

    /// Writes an already built value under `key`, bypassing the schema.
    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) {
        self.object.insert(key.into(), value);
    }
}
