use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use smart_json_path::CodingKey;
use smart_json_value::{JsonNumber, JsonObject, JsonValue};
use time::OffsetDateTime;
use url::Url;

use super::Decoder;
use crate::config::{DataStrategy, DateDecodingStrategy, NonConformingFloat};
use crate::data::{Color, Data};
use crate::error::DecodeError;

/// A type that can be read from a [`JsonValue`].
///
/// Models get this through [`SmartCodable`](crate::SmartCodable); scalars,
/// collections and the special types (dates, URLs, decimals, binary data)
/// implement it directly.
pub trait Decodable: Sized + 'static {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError>;

    /// Last-resort value when decoding fails and the enclosing model has no
    /// default for the field. `None` for types without a meaningful empty
    /// value, such as dates and URLs.
    fn zero_value() -> Option<Self> {
        None
    }

    /// `true` for `Option<T>`: missing keys and nulls are not anomalies.
    fn is_optional() -> bool {
        false
    }

    /// The value `null` stands for, if any.
    fn decode_null() -> Option<Self> {
        None
    }

    /// Unwraps the output of a transformer declared for a field of this
    /// type.
    #[doc(hidden)]
    fn from_any(boxed: Box<dyn Any>) -> Option<Self> {
        boxed.downcast::<Self>().ok().map(|b| *b)
    }
}

impl Decodable for bool {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let coerce = decoder.options().type_coercion;
        let decoded = match value {
            JsonValue::Bool(b) => Some(*b),
            JsonValue::Number(n) if coerce => match n.as_integral_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            JsonValue::String(text) if coerce => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        decoded.ok_or_else(|| decoder.mismatch::<Self>(value))
    }

    fn zero_value() -> Option<Self> {
        Some(false)
    }
}

impl Decodable for String {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let coerce = decoder.options().type_coercion;
        match value {
            JsonValue::String(text) => Ok(text.clone()),
            JsonValue::Number(n) if coerce => Ok(n.as_str().to_owned()),
            JsonValue::Bool(b) if coerce => Ok(b.to_string()),
            other => Err(decoder.mismatch::<Self>(other)),
        }
    }

    fn zero_value() -> Option<Self> {
        Some(String::new())
    }
}

/// Integer value of `n`, accepting fractions and exponents only when they
/// denote an exact integer and coercion is on.
fn integer_of(n: &JsonNumber, coerce: bool) -> Option<i128> {
    if let Some(v) = n.as_i128() {
        return Some(v);
    }
    if !coerce {
        return None;
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1.7e38 {
        Some(f as i128)
    } else {
        None
    }
}

macro_rules! decodable_int {
    ($($t:ty),*) => {
        $(
            impl Decodable for $t {
                fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
                    let coerce = decoder.options().type_coercion;
                    let wide = match value {
                        JsonValue::Number(n) => integer_of(n, coerce),
                        JsonValue::String(text) if coerce => {
                            JsonNumber::parse(text.trim()).and_then(|n| integer_of(&n, coerce))
                        }
                        JsonValue::Bool(b) if coerce => Some(i128::from(*b)),
                        _ => None,
                    };
                    wide.and_then(|w| <$t>::try_from(w).ok())
                        .ok_or_else(|| decoder.mismatch::<Self>(value))
                }

                fn zero_value() -> Option<Self> {
                    Some(0)
                }
            }
        )*
    };
}

decodable_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

/// Float value of `value`, honouring the non-conforming float tokens.
fn float_of(value: &JsonValue, decoder: &Decoder) -> Option<f64> {
    let options = decoder.options();
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(text) if decoder.is_restoring() => NonConformingFloat::raw()
            .decode_token(text)
            .or_else(|| options.non_conforming_float.decode_token(text)),
        JsonValue::String(text) => options
            .non_conforming_float
            .decode_token(text)
            .or_else(|| {
                options
                    .type_coercion
                    .then(|| JsonNumber::parse(text.trim()).and_then(|n| n.as_f64()))
                    .flatten()
            }),
        JsonValue::Bool(b) if options.type_coercion => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

impl Decodable for f64 {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        float_of(value, decoder).ok_or_else(|| decoder.mismatch::<Self>(value))
    }

    fn zero_value() -> Option<Self> {
        Some(0.0)
    }
}

impl Decodable for f32 {
    /// Read at `f64` precision, then narrowed.
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        float_of(value, decoder)
            .map(|v| v as f32)
            .ok_or_else(|| decoder.mismatch::<Self>(value))
    }

    fn zero_value() -> Option<Self> {
        Some(0.0)
    }
}

fn decimal_of(text: &str) -> Option<Decimal> {
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str(text).ok()
    }
}

impl Decodable for Decimal {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let decoded = match value {
            JsonValue::Number(n) => decimal_of(n.as_str()),
            JsonValue::String(text) if decoder.options().type_coercion => {
                JsonNumber::parse(text.trim()).and_then(|n| decimal_of(n.as_str()))
            }
            _ => None,
        };
        decoded.ok_or_else(|| decoder.mismatch::<Self>(value))
    }

    fn zero_value() -> Option<Self> {
        Some(Decimal::ZERO)
    }
}

impl Decodable for OffsetDateTime {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let date = if decoder.is_restoring() {
            DateDecodingStrategy::Iso8601.decode(value)
        } else {
            decoder.options().date_strategy.decode(value)
        };
        if let Some(date) = date {
            return Ok(date);
        }
        match value {
            JsonValue::String(text) => {
                Err(decoder.corrupted(format!("Date string '{text}' does not match any known format.")))
            }
            JsonValue::Number(n) => {
                Err(decoder.corrupted(format!("Timestamp {n} is out of range.")))
            }
            other => Err(decoder.mismatch::<Self>(other)),
        }
    }
}

impl Decodable for Url {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        match value {
            JsonValue::String(text) => Url::parse(text.trim())
                .map_err(|e| decoder.corrupted(format!("Invalid URL string '{text}': {e}."))),
            other => Err(decoder.mismatch::<Self>(other)),
        }
    }
}

impl Decodable for Data {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        match value {
            JsonValue::String(text) => {
                let strategy = if decoder.is_restoring() {
                    DataStrategy::Base64
                } else {
                    decoder.options().data_strategy
                };
                Data::from_base64(text, strategy)
                    .ok_or_else(|| decoder.corrupted("Encountered Data is not valid Base64."))
            }
            other => Err(decoder.mismatch::<Self>(other)),
        }
    }

    fn zero_value() -> Option<Self> {
        Some(Data::default())
    }
}

impl Decodable for Color {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        match value {
            JsonValue::String(text) => Color::from_hex(text)
                .ok_or_else(|| decoder.corrupted(format!("'{text}' is not a hex colour."))),
            other => Err(decoder.mismatch::<Self>(other)),
        }
    }

    fn zero_value() -> Option<Self> {
        Some(Color::default())
    }
}

impl Decodable for JsonValue {
    fn decode_value(value: &JsonValue, _decoder: &mut Decoder) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }

    fn zero_value() -> Option<Self> {
        Some(JsonValue::Null)
    }

    fn decode_null() -> Option<Self> {
        Some(JsonValue::Null)
    }
}

impl<T: Decodable> Decodable for Option<T> {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        match value {
            JsonValue::Null => Ok(None),
            other => T::decode_value(other, decoder).map(Some),
        }
    }

    fn zero_value() -> Option<Self> {
        Some(None)
    }

    fn is_optional() -> bool {
        true
    }

    fn decode_null() -> Option<Self> {
        Some(None)
    }

    fn from_any(boxed: Box<dyn Any>) -> Option<Self> {
        match boxed.downcast::<Option<T>>() {
            Ok(b) => Some(*b),
            Err(boxed) => T::from_any(boxed).map(Some),
        }
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        if !matches!(value, JsonValue::Array(_)) {
            return Err(decoder.mismatch::<Self>(value));
        }
        decoder.note_container::<Self>();
        let mut container = decoder.unkeyed_container(value)?;
        Ok(container.decode_remaining())
    }

    fn zero_value() -> Option<Self> {
        Some(Vec::new())
    }
}

/// Decodes every entry of an object into the map type `M`; failing
/// entries fall back to `T`'s zero value or are dropped, logged either way.
fn decode_entries<M: ?Sized, T: Decodable>(
    value: &JsonValue,
    decoder: &mut Decoder,
    mut insert: impl FnMut(String, T),
) -> Result<(), DecodeError> {
    let object: &JsonObject = match value {
        JsonValue::Object(object) => object,
        other => return Err(decoder.mismatch::<JsonObject>(other)),
    };
    decoder.note_container::<M>();
    for (key, entry) in object {
        let result = decoder.nested(CodingKey::from(key.as_str()), |d| {
            if entry.is_null() {
                T::decode_null().ok_or_else(|| DecodeError::value_not_found::<T>(d.coding_path()))
            } else {
                T::decode_value(entry, d)
            }
        });
        match result {
            Ok(decoded) => insert(key.clone(), decoded),
            Err(error) => {
                decoder.log_failure(key, &error);
                if let Some(zero) = T::zero_value() {
                    insert(key.clone(), zero);
                }
            }
        }
    }
    Ok(())
}

impl<T: Decodable, S: BuildHasher + Default + 'static> Decodable for HashMap<String, T, S> {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let mut map = HashMap::default();
        decode_entries::<Self, T>(value, decoder, |k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }

    fn zero_value() -> Option<Self> {
        Some(HashMap::default())
    }
}

impl<T: Decodable, S: BuildHasher + Default + 'static> Decodable for IndexMap<String, T, S> {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let mut map = IndexMap::default();
        decode_entries::<Self, T>(value, decoder, |k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }

    fn zero_value() -> Option<Self> {
        Some(IndexMap::default())
    }
}

impl<T: Decodable> Decodable for BTreeMap<String, T> {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let mut map = BTreeMap::new();
        decode_entries::<Self, T>(value, decoder, |k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }

    fn zero_value() -> Option<Self> {
        Some(BTreeMap::new())
    }
}
