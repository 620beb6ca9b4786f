//! Log records.

use std::fmt;

use smart_json_path::CodingPath;

/// Category of a field-level decoding anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// The key is absent from the payload.
    KeyNotFound,
    /// The key is present but holds `null` for a non-optional field.
    ValueNotFound,
    /// The value has the wrong shape for the field.
    TypeMismatch,
    /// The value has the right shape but could not be interpreted
    /// (bad date, bad base64, bad URL...).
    DataCorrupted,
}

impl LogKind {
    /// Kinds that survive [`crate::DebugLevel::Alert`].
    pub fn is_alert(self) -> bool {
        matches!(self, LogKind::TypeMismatch | LogKind::DataCorrupted)
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogKind::KeyNotFound => "key not found",
            LogKind::ValueNotFound => "value not found",
            LogKind::TypeMismatch => "type mismatch",
            LogKind::DataCorrupted => "data corrupted",
        };
        f.write_str(label)
    }
}

/// One anomaly on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogItem {
    /// Field (or `[index]` for array elements) the anomaly is about.
    pub field: String,
    pub kind: LogKind,
    pub description: String,
    /// Path of the container holding the field.
    pub path: CodingPath,
}

impl LogItem {
    pub fn new(
        field: impl Into<String>,
        kind: LogKind,
        description: impl Into<String>,
        path: CodingPath,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            description: description.into(),
            path,
        }
    }

    pub fn key_not_found(field: impl Into<String>, path: CodingPath) -> Self {
        Self::new(field, LogKind::KeyNotFound, "No value associated with key.", path)
    }

    pub fn value_not_found(field: impl Into<String>, expected: &str, path: CodingPath) -> Self {
        Self::new(
            field,
            LogKind::ValueNotFound,
            format!("Expected to decode '{expected}' but found null instead."),
            path,
        )
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &str,
        found: &str,
        path: CodingPath,
    ) -> Self {
        Self::new(
            field,
            LogKind::TypeMismatch,
            format!("Expected to decode '{expected}' but found '{found}' instead."),
            path,
        )
    }

    pub fn data_corrupted(
        field: impl Into<String>,
        description: impl Into<String>,
        path: CodingPath,
    ) -> Self {
        Self::new(field, LogKind::DataCorrupted, description, path)
    }
}

/// Items sharing one container path, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContainer {
    pub path: CodingPath,
    /// Type decoded at `path`, when the decoder announced one.
    pub type_name: Option<String>,
    pub items: Vec<LogItem>,
}

impl LogContainer {
    /// Width of the longest field name, used to align descriptions.
    pub fn field_width(&self) -> usize {
        self.items
            .iter()
            .map(|item| item.field.chars().count())
            .max()
            .unwrap_or(0)
    }
}
