//! Type-erased JSON values for fields whose shape is not known statically.

use indexmap::IndexMap;
use smart_json_value::{JsonNumber, JsonObject, JsonValue};

use crate::decoder::{Decodable, Decoder};
use crate::encoder::{Encodable, Encoder};
use crate::error::{DecodeError, EncodeError};

/// A number that remembers its concrete width.
///
/// Decoding picks `I64` for integers that fit, `U64` for larger unsigned
/// integers and `F64` for everything else, so `encode(decode(x))` is
/// stable. Numbers beyond the `f64` range have no width and become
/// [`SmartAny::Null`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmartNumber {
    F64(f64),
    F32(f32),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Isize(isize),
}

impl SmartNumber {
    pub fn from_json(number: &JsonNumber) -> Option<Self> {
        if number.is_integer() {
            if let Some(v) = number.as_i64() {
                return Some(SmartNumber::I64(v));
            }
            if let Some(v) = number.as_u64() {
                return Some(SmartNumber::U64(v));
            }
        }
        number
            .as_f64()
            .filter(|v| v.is_finite())
            .map(SmartNumber::F64)
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            SmartNumber::F64(v) => v,
            SmartNumber::F32(v) => f64::from(v),
            SmartNumber::I8(v) => f64::from(v),
            SmartNumber::I16(v) => f64::from(v),
            SmartNumber::I32(v) => f64::from(v),
            SmartNumber::I64(v) => v as f64,
            SmartNumber::U8(v) => f64::from(v),
            SmartNumber::U16(v) => f64::from(v),
            SmartNumber::U32(v) => f64::from(v),
            SmartNumber::U64(v) => v as f64,
            SmartNumber::Isize(v) => v as f64,
        }
    }

    /// Integer value, when the number is an integer width or an integral
    /// float.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            SmartNumber::I8(v) => Some(i64::from(v)),
            SmartNumber::I16(v) => Some(i64::from(v)),
            SmartNumber::I32(v) => Some(i64::from(v)),
            SmartNumber::I64(v) => Some(v),
            SmartNumber::U8(v) => Some(i64::from(v)),
            SmartNumber::U16(v) => Some(i64::from(v)),
            SmartNumber::U32(v) => Some(i64::from(v)),
            SmartNumber::U64(v) => i64::try_from(v).ok(),
            SmartNumber::Isize(v) => i64::try_from(v).ok(),
            SmartNumber::F64(_) | SmartNumber::F32(_) => {
                let f = self.as_f64();
                (f.fract() == 0.0 && f.abs() < 9.2e18).then_some(f as i64)
            }
        }
    }

    /// Widths are tried in a fixed order: floats first, then signed and
    /// unsigned integers from narrowest to widest, then the platform
    /// integer.
    fn encode(&self, encoder: &Encoder) -> Result<JsonValue, EncodeError> {
        let number = match *self {
            SmartNumber::F64(v) => return encoder.encode_f64(v),
            SmartNumber::F32(v) => return encoder.encode_f32(v),
            SmartNumber::I8(v) => JsonNumber::from(v),
            SmartNumber::I16(v) => JsonNumber::from(v),
            SmartNumber::I32(v) => JsonNumber::from(v),
            SmartNumber::I64(v) => JsonNumber::from(v),
            SmartNumber::U8(v) => JsonNumber::from(v),
            SmartNumber::U16(v) => JsonNumber::from(v),
            SmartNumber::U32(v) => JsonNumber::from(v),
            SmartNumber::U64(v) => JsonNumber::from(v),
            SmartNumber::Isize(v) => JsonNumber::from(v),
        };
        Ok(JsonValue::Number(number))
    }
}

macro_rules! smart_number_from {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<$t> for SmartNumber {
                fn from(value: $t) -> Self {
                    SmartNumber::$variant(value)
                }
            }
        )*
    };
}

smart_number_from!(
    f64 => F64, f32 => F32,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    isize => Isize
);

/// Any JSON value, decoded.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SmartAny {
    #[default]
    Null,
    Bool(bool),
    Number(SmartNumber),
    String(String),
    Array(Vec<SmartAny>),
    Dict(IndexMap<String, SmartAny>),
}

impl SmartAny {
    pub fn is_null(&self) -> bool {
        matches!(self, SmartAny::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SmartAny::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<SmartNumber> {
        match self {
            SmartAny::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SmartAny::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[SmartAny]> {
        match self {
            SmartAny::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, SmartAny>> {
        match self {
            SmartAny::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&SmartAny> {
        self.as_dict().and_then(|dict| dict.get(key))
    }

    fn encode(&self, encoder: &Encoder) -> Result<JsonValue, EncodeError> {
        Ok(match self {
            SmartAny::Null => JsonValue::Null,
            SmartAny::Bool(b) => JsonValue::Bool(*b),
            SmartAny::Number(n) => n.encode(encoder)?,
            SmartAny::String(s) => JsonValue::String(s.clone()),
            SmartAny::Array(items) => JsonValue::Array(
                items
                    .iter()
                    .map(|item| item.encode(encoder))
                    .collect::<Result<_, _>>()?,
            ),
            SmartAny::Dict(dict) => {
                let mut object = JsonObject::with_capacity(dict.len());
                for (key, value) in dict {
                    object.insert(key.clone(), value.encode(encoder)?);
                }
                JsonValue::Object(object)
            }
        })
    }
}

impl From<&JsonValue> for SmartAny {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => SmartAny::Null,
            JsonValue::Bool(b) => SmartAny::Bool(*b),
            JsonValue::Number(n) => SmartNumber::from_json(n)
                .map(SmartAny::Number)
                .unwrap_or(SmartAny::Null),
            JsonValue::String(s) => SmartAny::String(s.clone()),
            JsonValue::Array(items) => SmartAny::Array(items.iter().map(SmartAny::from).collect()),
            JsonValue::Object(object) => SmartAny::Dict(
                object
                    .iter()
                    .map(|(k, v)| (k.clone(), SmartAny::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Decodable for SmartAny {
    fn decode_value(value: &JsonValue, _decoder: &mut Decoder) -> Result<Self, DecodeError> {
        Ok(SmartAny::from(value))
    }

    fn zero_value() -> Option<Self> {
        Some(SmartAny::Null)
    }

    fn decode_null() -> Option<Self> {
        Some(SmartAny::Null)
    }
}

impl Encodable for SmartAny {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        self.encode(encoder)
    }
}
