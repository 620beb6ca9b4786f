//! Dotted paths into JSON documents.
//!
//! Two kinds of path live here:
//! - *designated paths* (`"result.data.0.name"`) that locate a subtree before
//!   model decoding starts, and that key mappings use for cross-level lookups;
//! - *coding paths* ([`CodingPath`]) that record where the decoder is while it
//!   walks a document, used to address diagnostics.

mod coding;

pub use coding::{CodingKey, CodingPath};

use smart_json_value::{parse_str, JsonValue};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty segment at position {0}")]
    EmptySegment(usize),
    #[error("dangling escape at end of path")]
    DanglingEscape,
}

/// Unescapes one path segment: `\.` becomes `.` and `\\` becomes `\`.
pub fn unescape_segment(segment: &str) -> String {
    if !segment.contains('\\') {
        return segment.to_string();
    }
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Escapes one path segment so that dots inside a key survive a round trip.
pub fn escape_segment(segment: &str) -> String {
    if !segment.contains('.') && !segment.contains('\\') {
        return segment.to_string();
    }
    segment.replace('\\', "\\\\").replace('.', "\\.")
}

/// Splits a dotted path into unescaped segments.
///
/// Examples:
/// - `"" -> []`
/// - `"a.b.0" -> ["a", "b", "0"]`
/// - `"a\.b.c" -> ["a.b", "c"]`
pub fn parse_path(path: &str) -> Result<Vec<String>, PathError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next) => current.push(next),
                None => return Err(PathError::DanglingEscape),
            },
            '.' => {
                if current.is_empty() {
                    return Err(PathError::EmptySegment(segments.len()));
                }
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if current.is_empty() {
        return Err(PathError::EmptySegment(segments.len()));
    }
    segments.push(current);
    Ok(segments)
}

/// Joins segments back into a dotted path.
pub fn format_path(segments: &[String]) -> String {
    segments
        .iter()
        .map(|s| escape_segment(s))
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolves one step. Objects are addressed by key, numeric segments
/// included; arrays need a numeric segment.
fn step<'a>(value: &'a JsonValue, segment: &str) -> Option<&'a JsonValue> {
    match value {
        JsonValue::Object(obj) => obj.get(segment),
        JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Borrowing lookup over already-split segments. Does not look inside
/// strings holding embedded JSON.
pub fn find<'a, S: AsRef<str>>(value: &'a JsonValue, segments: &[S]) -> Option<&'a JsonValue> {
    let mut current = value;
    for segment in segments {
        current = step(current, segment.as_ref())?;
    }
    Some(current)
}

/// Extracts the subtree a designated path points at.
///
/// A string met along the way is parsed as embedded JSON before the next
/// segment is applied. Any segment that cannot be resolved, and any
/// malformed path, yields `None`: "nothing found" is not an error.
pub fn extract(value: &JsonValue, path: &str) -> Option<JsonValue> {
    let segments = parse_path(path).ok()?;
    let mut owned: Option<JsonValue> = None;
    for segment in &segments {
        let current = owned.as_ref().unwrap_or(value);
        let next = match current {
            JsonValue::String(text) => {
                let embedded = parse_str(text).ok()?;
                step(&embedded, segment)?.clone()
            }
            other => step(other, segment)?.clone(),
        };
        owned = Some(next);
    }
    Some(owned.unwrap_or_else(|| value.clone()))
}
