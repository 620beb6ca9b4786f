use smart_json_path::CodingPath;
use smart_json_value::{JsonValue, ParseError};
use thiserror::Error;

use crate::names::short_type_name;

/// Errors that abort a decode call.
///
/// Field-level problems never surface here while a default can be
/// substituted; they are reported through the sentinel instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("expected '{expected}' but found '{found}' at '{path}'")]
    TypeMismatch {
        path: CodingPath,
        expected: String,
        found: String,
    },
    #[error("no value associated with key '{key}' at '{path}'")]
    KeyNotFound { path: CodingPath, key: String },
    #[error("expected '{expected}' but found null at '{path}'")]
    ValueNotFound { path: CodingPath, expected: String },
    #[error("data corrupted at '{path}': {message}")]
    DataCorrupted { path: CodingPath, message: String },
    #[error("nothing found at designated path '{0}'")]
    DesignatedPathNotFound(String),
}

impl DecodeError {
    pub fn type_mismatch<T: ?Sized>(path: &CodingPath, found: &JsonValue) -> Self {
        DecodeError::TypeMismatch {
            path: path.clone(),
            expected: short_type_name::<T>(),
            found: found.kind_name().to_owned(),
        }
    }

    pub fn value_not_found<T: ?Sized>(path: &CodingPath) -> Self {
        DecodeError::ValueNotFound {
            path: path.clone(),
            expected: short_type_name::<T>(),
        }
    }

    pub fn data_corrupted(path: &CodingPath, message: impl Into<String>) -> Self {
        DecodeError::DataCorrupted {
            path: path.clone(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("cannot encode non-conforming float {value} at '{path}'")]
    NonConformingFloat { path: CodingPath, value: f64 },
    #[error("invalid value at '{path}': {message}")]
    InvalidValue { path: CodingPath, message: String },
    #[error("top-level value encoded as {found}, expected an object")]
    TopLevelNotObject { found: &'static str },
}
