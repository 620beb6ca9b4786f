use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use rust_decimal::Decimal;
use smart_json_path::CodingKey;
use smart_json_value::{JsonNumber, JsonObject, JsonValue};
use time::OffsetDateTime;
use url::Url;

use super::Encoder;
use crate::data::{Color, Data};
use crate::error::EncodeError;

/// A type that can be written as a [`JsonValue`].
pub trait Encodable {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError>;

    /// `true` when the field should be left out of its object entirely.
    fn is_absent(&self) -> bool {
        false
    }
}

impl Encodable for bool {
    fn encode_value(&self, _encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        Ok(JsonValue::Bool(*self))
    }
}

impl Encodable for String {
    fn encode_value(&self, _encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        Ok(JsonValue::String(self.clone()))
    }
}

impl Encodable for str {
    fn encode_value(&self, _encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        Ok(JsonValue::String(self.to_owned()))
    }
}

macro_rules! encodable_int {
    ($($t:ty),*) => {
        $(
            impl Encodable for $t {
                fn encode_value(&self, _encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
                    Ok(JsonValue::Number(JsonNumber::from(*self)))
                }
            }
        )*
    };
}

encodable_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl Encodable for f64 {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        encoder.encode_f64(*self)
    }
}

impl Encodable for f32 {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        encoder.encode_f32(*self)
    }
}

impl Encodable for Decimal {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        let text = self.normalize().to_string();
        JsonNumber::parse(&text)
            .map(JsonValue::Number)
            .ok_or_else(|| encoder.invalid(format!("decimal {text} is not a JSON number")))
    }
}

impl Encodable for OffsetDateTime {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        encoder
            .options()
            .date_strategy
            .encode(self)
            .ok_or_else(|| encoder.invalid(format!("date {self} cannot be written with the configured strategy")))
    }
}

impl Encodable for Url {
    fn encode_value(&self, _encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        Ok(JsonValue::String(self.as_str().to_owned()))
    }
}

impl Encodable for Data {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        Ok(JsonValue::String(self.to_base64(encoder.options().data_strategy)))
    }
}

impl Encodable for Color {
    fn encode_value(&self, _encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        Ok(JsonValue::String(self.to_string()))
    }
}

impl Encodable for JsonValue {
    fn encode_value(&self, _encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        Ok(self.clone())
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        match self {
            Some(value) => value.encode_value(encoder),
            None => Ok(JsonValue::Null),
        }
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl<T: Encodable> Encodable for [T] {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        let mut items = Vec::with_capacity(self.len());
        for (i, item) in self.iter().enumerate() {
            items.push(encoder.nested(CodingKey::Index(i), |e| item.encode_value(e))?);
        }
        Ok(JsonValue::Array(items))
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        self.as_slice().encode_value(encoder)
    }
}

fn encode_entries<'a, T: Encodable + 'a>(
    entries: impl Iterator<Item = (&'a String, &'a T)>,
    encoder: &mut Encoder,
) -> Result<JsonValue, EncodeError> {
    let mut object = JsonObject::new();
    for (key, value) in entries {
        if value.is_absent() {
            continue;
        }
        let json = encoder.nested(CodingKey::from(key.as_str()), |e| value.encode_value(e))?;
        object.insert(key.clone(), json);
    }
    Ok(JsonValue::Object(object))
}

impl<T: Encodable, S> Encodable for HashMap<String, T, S> {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        encode_entries(self.iter(), encoder)
    }
}

impl<T: Encodable, S> Encodable for IndexMap<String, T, S> {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        encode_entries(self.iter(), encoder)
    }
}

impl<T: Encodable> Encodable for BTreeMap<String, T> {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        encode_entries(self.iter(), encoder)
    }
}
