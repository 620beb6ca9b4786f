use std::borrow::Cow;
use std::sync::Arc;

use smart_json_path::{CodingKey, CodingPath};
use smart_json_sentinel::LogItem;
use smart_json_value::{JsonObject, JsonValue};

use super::{Decodable, Decoder, UnkeyedContainer};
use crate::error::DecodeError;
use crate::key::map_keys;
use crate::names::short_type_name;
use crate::schema::Schema;

/// Field access for one JSON object, handed to
/// [`SmartCodable::decode`](crate::SmartCodable::decode).
///
/// Keys are looked up after the key strategy and the model's renames have
/// been applied. [`KeyedContainer::decode`] only fails when a field cannot
/// be decoded and has no default to fall back on.
pub struct KeyedContainer<'d, 'v> {
    decoder: &'d mut Decoder,
    source: &'v JsonValue,
    object: Cow<'v, JsonObject>,
    schema: Arc<Schema>,
    /// `false` for containers opened by hand inside a model: their keys
    /// are not the model's fields, so only zero values stand in for them.
    model_defaults: bool,
}

fn lookup<'o>(object: &'o JsonObject, key: &str, case_insensitive: bool) -> Option<&'o JsonValue> {
    match object.get(key) {
        Some(value) => Some(value),
        None if case_insensitive => object
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, value)| value),
        None => None,
    }
}

impl<'d, 'v> KeyedContainer<'d, 'v> {
    pub(crate) fn new(
        decoder: &'d mut Decoder,
        source: &'v JsonValue,
        object: Cow<'v, JsonObject>,
        schema: Arc<Schema>,
    ) -> Self {
        Self {
            decoder,
            source,
            object,
            schema,
            model_defaults: true,
        }
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.decoder.coding_path()
    }

    pub fn decoder(&mut self) -> &mut Decoder {
        &mut *self.decoder
    }

    /// Keys of the object after mapping.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.object.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        lookup(&self.object, key, self.decoder.options().case_insensitive_keys)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Decodes `key`, substituting a default and logging when the value is
    /// missing, null or unusable.
    ///
    /// Resolution order: ignored fields take their default; flattened
    /// fields read the whole enclosing object; a declared transformer gets
    /// the first try at a present value; then the field type decodes it,
    /// coercions included. Defaults come from the model's default instance
    /// first and from the type's zero value second.
    pub fn decode<F: Decodable>(&mut self, key: &str) -> Result<F, DecodeError> {
        let model_defaults = self.model_defaults;
        if self.schema.is_ignored(key) {
            let error = self.key_not_found(key);
            return restore_default(self.decoder, key, model_defaults, error);
        }
        if self.schema.is_flattened(key) {
            let source = self.source;
            return match F::decode_value(source, self.decoder) {
                Ok(value) => Ok(value),
                Err(error) => {
                    self.decoder.log_failure(key, &error);
                    restore_default(self.decoder, key, model_defaults, error)
                }
            };
        }

        let case_insensitive = self.decoder.options().case_insensitive_keys;
        let decoder = &mut *self.decoder;
        let transformer = if decoder.is_restoring() {
            None
        } else {
            self.schema.transformer(key).cloned()
        };
        match lookup(&self.object, key, case_insensitive) {
            None => {
                let error = DecodeError::KeyNotFound {
                    path: decoder.coding_path().clone(),
                    key: key.to_owned(),
                };
                let seeded = model_defaults && decoder.cache.is_seeded();
                if !F::is_optional() && !seeded {
                    decoder.log(|path| LogItem::key_not_found(key, path));
                }
                restore_default(decoder, key, model_defaults, error)
            }
            Some(value) => {
                if let Some(transformer) = transformer {
                    let transformed = transformer.decode_any(value).and_then(F::from_any);
                    if let Some(field) = transformed {
                        return Ok(field);
                    }
                    if value.is_null() {
                        if let Some(field) = F::decode_null() {
                            return Ok(field);
                        }
                    }
                    let error = decoder.nested(CodingKey::from(key), |d| {
                        d.corrupted(format!(
                            "Transformer could not convert {} to '{}'.",
                            value.kind_name(),
                            short_type_name::<F>()
                        ))
                    });
                    decoder.log_failure(key, &error);
                    return restore_default(decoder, key, model_defaults, error);
                }

                if value.is_null() {
                    if let Some(field) = F::decode_null() {
                        return Ok(field);
                    }
                    let error = DecodeError::value_not_found::<F>(decoder.coding_path());
                    decoder.log_failure(key, &error);
                    return restore_default(decoder, key, model_defaults, error);
                }

                match decoder.nested(CodingKey::from(key), |d| F::decode_value(value, d)) {
                    Ok(field) => Ok(field),
                    Err(error) => {
                        decoder.log_failure(key, &error);
                        restore_default(decoder, key, model_defaults, error)
                    }
                }
            }
        }
    }

    /// `None` when the key is absent or null; otherwise as
    /// [`KeyedContainer::decode`].
    pub fn decode_if_present<F: Decodable>(&mut self, key: &str) -> Result<Option<F>, DecodeError> {
        self.decode::<Option<F>>(key)
    }

    /// Decodes `key`, or returns `fallback` without logging when the key is
    /// absent.
    pub fn decode_or<F: Decodable>(&mut self, key: &str, fallback: F) -> Result<F, DecodeError> {
        if self.contains(key) {
            self.decode(key)
        } else {
            Ok(fallback)
        }
    }

    /// Gives `f` a container for the object at `key`. The session's key
    /// strategy applies to its keys; fields missing from it fall back to
    /// zero values, never to the enclosing model's defaults.
    pub fn nested_keyed<R>(
        &mut self,
        key: &str,
        f: impl FnOnce(&mut KeyedContainer<'_, '_>) -> Result<R, DecodeError>,
    ) -> Result<R, DecodeError> {
        let case_insensitive = self.decoder.options().case_insensitive_keys;
        let decoder = &mut *self.decoder;
        let Some(value) = lookup(&self.object, key, case_insensitive) else {
            return Err(DecodeError::KeyNotFound {
                path: decoder.coding_path().clone(),
                key: key.to_owned(),
            });
        };
        decoder.nested(CodingKey::from(key), |d| match value {
            JsonValue::Object(object) => {
                let mapped = if d.is_restoring() {
                    Cow::Borrowed(object)
                } else {
                    map_keys(object, d.options().key_strategy, &Schema::default())
                };
                let mut container = KeyedContainer::new(d, value, mapped, Arc::default());
                container.model_defaults = false;
                f(&mut container)
            }
            other => Err(d.mismatch::<JsonObject>(other)),
        })
    }

    /// Gives `f` a container for the array at `key`.
    pub fn nested_unkeyed<R>(
        &mut self,
        key: &str,
        f: impl FnOnce(&mut UnkeyedContainer<'_, '_>) -> Result<R, DecodeError>,
    ) -> Result<R, DecodeError> {
        let case_insensitive = self.decoder.options().case_insensitive_keys;
        let decoder = &mut *self.decoder;
        let Some(value) = lookup(&self.object, key, case_insensitive) else {
            return Err(DecodeError::KeyNotFound {
                path: decoder.coding_path().clone(),
                key: key.to_owned(),
            });
        };
        decoder.nested(CodingKey::from(key), |d| {
            let mut container = d.unkeyed_container(value)?;
            f(&mut container)
        })
    }

    fn key_not_found(&self, key: &str) -> DecodeError {
        DecodeError::KeyNotFound {
            path: self.decoder.coding_path().clone(),
            key: key.to_owned(),
        }
    }
}

/// Default for `key` of the model being decoded: its value in the
/// model's default instance (when `model_defaults`), else the field
/// type's zero value, else `error`.
fn restore_default<F: Decodable>(
    decoder: &mut Decoder,
    key: &str,
    model_defaults: bool,
    error: DecodeError,
) -> Result<F, DecodeError> {
    let default = if model_defaults {
        decoder.cache.default_for(key)
    } else {
        None
    };
    if let Some(default) = default {
        let restored = decoder.restoring(|d| {
            d.nested(CodingKey::from(key), |d| match &default {
                JsonValue::Null => F::decode_null()
                    .ok_or_else(|| DecodeError::value_not_found::<F>(d.coding_path())),
                value => F::decode_value(value, d),
            })
        });
        if let Ok(field) = restored {
            tracing::debug!(path = %decoder.coding_path(), key, "restored default");
            return Ok(field);
        }
    }
    match F::zero_value() {
        Some(field) => {
            tracing::debug!(path = %decoder.coding_path(), key, "substituted zero value");
            Ok(field)
        }
        None => Err(error),
    }
}
