//! Model and enum traits.

use smart_json_value::JsonValue;

use crate::decoder::{Decodable, Decoder, KeyedContainer};
use crate::encoder::{Encodable, Encoder, KeyedEncodingContainer};
use crate::error::{DecodeError, EncodeError};
use crate::names::short_type_name;
use crate::schema::Schema;

/// A struct decoded from, and encoded to, a JSON object field by field.
///
/// `Default` supplies the value of every field that is missing, null or
/// unusable in the payload.
///
/// ```
/// use smart_json::{DecodeError, EncodeError, KeyedContainer, KeyedEncodingContainer, Schema, SmartCodable};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct User {
///     name: String,
///     age: i64,
///     nickname: Option<String>,
/// }
///
/// impl SmartCodable for User {
///     fn schema() -> Schema {
///         Schema::builder().rename("nickname", ["nick_name", "alias"]).build()
///     }
///
///     fn decode(c: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError> {
///         Ok(Self {
///             name: c.decode("name")?,
///             age: c.decode("age")?,
///             nickname: c.decode("nickname")?,
///         })
///     }
///
///     fn encode(&self, c: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError> {
///         c.encode("name", &self.name)?;
///         c.encode("age", &self.age)?;
///         c.encode("nickname", &self.nickname)
///     }
/// }
///
/// let user: User = smart_json::from_str(r#"{"name": "Ann", "age": "41", "alias": "A"}"#).unwrap();
/// assert_eq!(user, User { name: "Ann".into(), age: 41, nickname: Some("A".into()) });
/// ```
pub trait SmartCodable: Default + 'static {
    /// Renames, transformers, ignored and flattened fields.
    fn schema() -> Schema {
        Schema::default()
    }

    fn decode(container: &mut KeyedContainer<'_, '_>) -> Result<Self, DecodeError>;

    fn encode(&self, container: &mut KeyedEncodingContainer<'_>) -> Result<(), EncodeError>;

    /// Runs after every field has been decoded.
    fn did_finish_mapping(&mut self) {}

    fn deserialize(json: &str) -> Result<Self, DecodeError> {
        crate::from_str(json)
    }

    fn to_json_string(&self) -> Result<String, EncodeError> {
        crate::to_string(self)
    }
}

impl<T: SmartCodable> Decodable for T {
    fn decode_value(value: &JsonValue, decoder: &mut Decoder) -> Result<Self, DecodeError> {
        decoder.decode_model::<T>(value)
    }

    fn zero_value() -> Option<Self> {
        Some(T::default())
    }
}

impl<T: SmartCodable> Encodable for T {
    fn encode_value(&self, encoder: &mut Encoder) -> Result<JsonValue, EncodeError> {
        encoder.encode_model(self)
    }
}

/// An enum carried as a raw value, falling back to its `Default` case when
/// the payload holds an unknown one.
///
/// Implemented through [`impl_case_defaultable!`](crate::impl_case_defaultable).
pub trait SmartCaseDefaultable: Default + Sized + 'static {
    type Raw: Decodable + Encodable;

    fn from_raw(raw: &Self::Raw) -> Option<Self>;

    fn raw_value(&self) -> Self::Raw;
}

#[doc(hidden)]
pub fn decode_case<T: SmartCaseDefaultable>(
    value: &JsonValue,
    decoder: &mut Decoder,
) -> Result<T, DecodeError> {
    let raw = T::Raw::decode_value(value, decoder)?;
    T::from_raw(&raw).ok_or_else(|| {
        decoder.corrupted(format!(
            "Cannot initialize {} from invalid value {}.",
            short_type_name::<T>(),
            crate::value_to_string(value)
        ))
    })
}

#[doc(hidden)]
pub fn encode_case<T: SmartCaseDefaultable>(
    case: &T,
    encoder: &mut Encoder,
) -> Result<JsonValue, EncodeError> {
    case.raw_value().encode_value(encoder)
}

/// Implements [`SmartCaseDefaultable`], [`Decodable`] and [`Encodable`] for
/// a fieldless enum, listing every case with its raw value:
///
/// ```
/// use smart_json::impl_case_defaultable;
///
/// #[derive(Debug, Default, Clone, Copy, PartialEq)]
/// enum Gender {
///     Male,
///     Female,
///     #[default]
///     Unknown,
/// }
///
/// impl_case_defaultable!(Gender: String {
///     Male => "male",
///     Female => "female",
///     Unknown => "unknown",
/// });
///
/// let genders: Vec<Gender> = smart_json::from_str(r#"["female", "robot"]"#).unwrap();
/// assert_eq!(genders, [Gender::Female, Gender::Unknown]);
/// ```
#[macro_export]
macro_rules! impl_case_defaultable {
    ($ty:ident : $raw:ty { $($case:ident => $value:expr),+ $(,)? }) => {
        impl $crate::SmartCaseDefaultable for $ty {
            type Raw = $raw;

            fn from_raw(raw: &$raw) -> ::core::option::Option<Self> {
                $(
                    if *raw == $value {
                        return ::core::option::Option::Some($ty::$case);
                    }
                )+
                ::core::option::Option::None
            }

            fn raw_value(&self) -> $raw {
                match self {
                    $( $ty::$case => <$raw>::from($value), )+
                }
            }
        }

        impl $crate::Decodable for $ty {
            fn decode_value(
                value: &$crate::JsonValue,
                decoder: &mut $crate::Decoder,
            ) -> ::core::result::Result<Self, $crate::DecodeError> {
                $crate::decode_case::<$ty>(value, decoder)
            }

            fn zero_value() -> ::core::option::Option<Self> {
                ::core::option::Option::Some(<$ty as ::core::default::Default>::default())
            }
        }

        impl $crate::Encodable for $ty {
            fn encode_value(
                &self,
                encoder: &mut $crate::Encoder,
            ) -> ::core::result::Result<$crate::JsonValue, $crate::EncodeError> {
                $crate::encode_case(self, encoder)
            }
        }
    };
}
