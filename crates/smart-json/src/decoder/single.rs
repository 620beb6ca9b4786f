use smart_json_path::CodingKey;
use smart_json_value::JsonValue;

use super::{Decodable, Decoder};
use crate::error::DecodeError;

/// Access to one scalar value, for hand-written [`Decodable`] impls and
/// for documents whose root is not an object.
pub struct SingleValueContainer<'d, 'v> {
    decoder: &'d mut Decoder,
    value: &'v JsonValue,
}

impl<'d, 'v> SingleValueContainer<'d, 'v> {
    pub(crate) fn new(decoder: &'d mut Decoder, value: &'v JsonValue) -> Self {
        Self { decoder, value }
    }

    pub fn value(&self) -> &'v JsonValue {
        self.value
    }

    pub fn decode_nil(&self) -> bool {
        self.value.is_null()
    }

    /// Decodes the value as `T`, falling back to `T`'s zero value (logged)
    /// when it does not fit.
    pub fn decode<T: Decodable>(&mut self) -> Result<T, DecodeError> {
        let value = self.value;
        let result = if value.is_null() {
            T::decode_null()
                .ok_or_else(|| DecodeError::value_not_found::<T>(self.decoder.coding_path()))
        } else {
            T::decode_value(value, self.decoder)
        };
        match result {
            Ok(decoded) => Ok(decoded),
            Err(error) => {
                let field = match self.decoder.coding_path().last() {
                    Some(CodingKey::Key(key)) => key.clone(),
                    Some(index) => index.to_string(),
                    None => "<root>".to_owned(),
                };
                self.decoder.log_failure(&field, &error);
                T::zero_value().ok_or(error)
            }
        }
    }
}
