use smart_json_path::{CodingKey, CodingPath};
use smart_json_value::JsonValue;

use super::{Decodable, Decoder};
use crate::error::DecodeError;

/// Sequential access to the elements of one JSON array.
///
/// The index advances past every element handed out, whether it decoded,
/// fell back to its type's zero value, or had to be skipped.
pub struct UnkeyedContainer<'d, 'v> {
    decoder: &'d mut Decoder,
    items: &'v [JsonValue],
    index: usize,
}

impl<'d, 'v> UnkeyedContainer<'d, 'v> {
    pub(crate) fn new(decoder: &'d mut Decoder, items: &'v [JsonValue]) -> Self {
        Self {
            decoder,
            items,
            index: 0,
        }
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.decoder.coding_path()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.items.len()
    }

    /// Decodes the next element. A failing element is logged and replaced
    /// by `T`'s zero value; without one the error is returned and the
    /// element is skipped.
    pub fn decode<T: Decodable>(&mut self) -> Result<T, DecodeError> {
        let index = self.index;
        let Some(value) = self.items.get(index) else {
            let mut path = self.decoder.coding_path().clone();
            path.push(CodingKey::Index(index));
            return Err(DecodeError::value_not_found::<T>(&path));
        };
        self.index += 1;

        let decoder = &mut *self.decoder;
        let result = decoder.nested(CodingKey::Index(index), |d| {
            if value.is_null() {
                T::decode_null().ok_or_else(|| DecodeError::value_not_found::<T>(d.coding_path()))
            } else {
                T::decode_value(value, d)
            }
        });
        match result {
            Ok(element) => Ok(element),
            Err(error) => {
                decoder.log_failure(&format!("[{index}]"), &error);
                match T::zero_value() {
                    Some(element) => Ok(element),
                    None => {
                        tracing::debug!(path = %decoder.coding_path(), index, "skipped element");
                        Err(error)
                    }
                }
            }
        }
    }

    /// Consumes the next element if it is `null`.
    pub fn decode_nil(&mut self) -> bool {
        match self.items.get(self.index) {
            Some(JsonValue::Null) => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }

    /// Decodes every remaining element, dropping the ones without a
    /// usable value.
    pub fn decode_remaining<T: Decodable>(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.items.len().saturating_sub(self.index));
        while !self.is_at_end() {
            if let Ok(element) = self.decode::<T>() {
                out.push(element);
            }
        }
        out
    }
}
