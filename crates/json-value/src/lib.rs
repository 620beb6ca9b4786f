//! JSON value tree, parser and writer for smart-json.
//!
//! - [`JsonValue`] - parsed document; numbers stay textual ([`JsonNumber`])
//!   until a typed consumer converts them
//! - [`parse`] / [`JsonDecoder`] - recursive-descent reader with byte-offset
//!   errors and a nesting limit of [`MAX_DEPTH`]
//! - [`to_vec`] / [`JsonEncoder`] - compact or pretty writer, optionally with
//!   sorted keys
//!
//! # Example
//!
//! ```
//! use smart_json_value::{parse_str, to_string, WriteOptions};
//!
//! let value = parse_str(r#"{"b": 1.50, "a": [true, null]}"#).unwrap();
//! assert_eq!(value.get("b").and_then(|b| b.as_f64()), Some(1.5));
//! assert_eq!(
//!     to_string(&value, WriteOptions::default().with_sorted_keys(true)),
//!     r#"{"a":[true,null],"b":1.50}"#
//! );
//! ```

mod decoder;
mod encoder;
mod error;
mod number;
mod value;

pub use decoder::{parse, parse_str, JsonDecoder, MAX_DEPTH};
pub use encoder::{numeric_aware_cmp, to_string, to_vec, JsonEncoder, WriteOptions};
pub use error::{ParseError, ParseErrorKind};
pub use number::JsonNumber;
pub use value::{JsonObject, JsonValue};
