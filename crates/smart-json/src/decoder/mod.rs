//! Walks a [`JsonValue`] tree into typed values.
//!
//! One [`Decoder`] serves one top-level decode call. It owns the call's
//! options, the snapshot cache and the sentinel session, and tracks the
//! coding path so every anomaly can be reported where it happened.

mod decodable;
mod keyed;
mod single;
mod unkeyed;

pub use decodable::Decodable;
pub use keyed::KeyedContainer;
pub use single::SingleValueContainer;
pub use unkeyed::UnkeyedContainer;

use std::borrow::Cow;

use smart_json_path::{CodingKey, CodingPath};
use smart_json_sentinel::{LogItem, Sentinel};
use smart_json_value::{parse_str, JsonObject, JsonValue};

use crate::cache::DecodingCache;
use crate::config::DecodeOptions;
use crate::error::DecodeError;
use crate::key::map_keys;
use crate::model::SmartCodable;
use crate::names::short_type_name;

pub struct Decoder {
    options: DecodeOptions,
    cache: DecodingCache,
    sentinel: Sentinel,
    path: CodingPath,
    restoring: bool,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        let sentinel = match options.debug_level {
            Some(level) => Sentinel::with_level(level),
            None => Sentinel::new(),
        };
        Self {
            options,
            cache: DecodingCache::default(),
            sentinel,
            path: CodingPath::new(),
            restoring: false,
        }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    pub fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }

    /// Decodes the document root. Unlike fields, the root gets no default:
    /// if it cannot be decoded the call fails. The sentinel report is
    /// emitted either way.
    pub fn decode_root<T: Decodable>(&mut self, value: &JsonValue) -> Result<T, DecodeError> {
        let result = T::decode_value(value, self);
        self.sentinel.emit();
        result
    }

    /// Like [`Decoder::decode_root`], but fields absent from `value` keep
    /// the values found in `seed`.
    pub(crate) fn decode_root_seeded<T: SmartCodable>(
        &mut self,
        value: &JsonValue,
        seed: JsonObject,
    ) -> Result<T, DecodeError> {
        let result = self.decode_model_with::<T>(value, Some(seed));
        self.sentinel.emit();
        result
    }

    /// Formats and hands off the sentinel report without ending the
    /// decoder; used by callers driving containers by hand.
    pub fn emit_report(&mut self) {
        self.sentinel.emit();
    }

    pub fn single_value_container<'v>(&mut self, value: &'v JsonValue) -> SingleValueContainer<'_, 'v> {
        SingleValueContainer::new(self, value)
    }

    pub fn unkeyed_container<'v>(
        &mut self,
        value: &'v JsonValue,
    ) -> Result<UnkeyedContainer<'_, 'v>, DecodeError> {
        match value {
            JsonValue::Array(items) => Ok(UnkeyedContainer::new(self, items)),
            other => Err(DecodeError::type_mismatch::<Vec<JsonValue>>(&self.path, other)),
        }
    }

    /// Type mismatch between `T` and `value` at the current path.
    pub fn mismatch<T: ?Sized>(&self, value: &JsonValue) -> DecodeError {
        DecodeError::type_mismatch::<T>(&self.path, value)
    }

    pub fn corrupted(&self, message: impl Into<String>) -> DecodeError {
        DecodeError::data_corrupted(&self.path, message)
    }

    /// Runs `f` one level deeper in the coding path.
    pub(crate) fn nested<R>(&mut self, key: CodingKey, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(key);
        let result = f(self);
        self.path.pop();
        result
    }

    /// Records an anomaly for a field of the container at the current path.
    /// Nothing is built when the sentinel is off.
    pub(crate) fn log(&mut self, make: impl FnOnce(CodingPath) -> LogItem) {
        if self.sentinel.is_enabled() {
            let item = make(self.path.clone());
            self.sentinel.record(item);
        }
    }

    pub(crate) fn log_failure(&mut self, field: &str, error: &DecodeError) {
        self.log(|path| match error {
            DecodeError::TypeMismatch {
                expected, found, ..
            } => LogItem::type_mismatch(field, expected, found, path),
            DecodeError::ValueNotFound { expected, .. } => {
                LogItem::value_not_found(field, expected, path)
            }
            DecodeError::KeyNotFound { .. } => LogItem::key_not_found(field, path),
            DecodeError::DataCorrupted { message, .. } => {
                LogItem::data_corrupted(field, message.as_str(), path)
            }
            other => LogItem::data_corrupted(field, other.to_string(), path),
        });
    }

    pub(crate) fn note_container<T: ?Sized>(&mut self) {
        if self.sentinel.is_enabled() {
            let name = short_type_name::<T>();
            self.sentinel.note_container(&self.path, &name);
        }
    }

    /// Runs `f` with the sentinel muted.
    pub(crate) fn quietly<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.sentinel.mute();
        let result = f(self);
        self.sentinel.unmute();
        result
    }

    /// `true` while a captured default is read back. Captured values are in
    /// raw form: declared field names, no transformers, standard base64,
    /// RFC 3339 dates and the raw non-finite float tokens.
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    /// Runs `f` muted and in restoring mode.
    pub(crate) fn restoring<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let outer = std::mem::replace(&mut self.restoring, true);
        let result = self.quietly(f);
        self.restoring = outer;
        result
    }

    pub(crate) fn decode_model<T: SmartCodable>(&mut self, value: &JsonValue) -> Result<T, DecodeError> {
        self.decode_model_with::<T>(value, None)
    }

    fn decode_model_with<T: SmartCodable>(
        &mut self,
        value: &JsonValue,
        seed: Option<JsonObject>,
    ) -> Result<T, DecodeError> {
        let embedded;
        let value = match value {
            JsonValue::String(text) => match parse_str(text) {
                Ok(parsed @ JsonValue::Object(_)) => {
                    embedded = parsed;
                    &embedded
                }
                _ => value,
            },
            _ => value,
        };
        let JsonValue::Object(object) = value else {
            return Err(self.mismatch::<T>(value));
        };

        self.note_container::<T>();
        match seed {
            Some(seed) => self.cache.push_seeded::<T>(seed),
            None => self.cache.push::<T>(),
        }
        let schema = self.cache.schema();
        let mapped: Cow<'_, JsonObject> = if self.restoring {
            Cow::Borrowed(object)
        } else {
            map_keys(object, self.options.key_strategy, &schema)
        };
        let result = {
            let mut container = KeyedContainer::new(self, value, mapped, schema);
            T::decode(&mut container)
        };
        self.cache.pop::<T>();

        let mut model = result?;
        model.did_finish_mapping();
        Ok(model)
    }
}
