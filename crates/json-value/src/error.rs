//! Parser error type.

use thiserror::Error;

/// What went wrong while reading a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input ended while a value was still open.
    UnexpectedEndOfFile,
    /// A byte that cannot start or continue the current token.
    UnexpectedCharacter(u8),
    /// A raw control character (< 0x20) inside a string literal.
    UnescapedControlCharacterInString(u8),
    /// Input ended before the closing quote of a string.
    UnexpectedEndOfString,
    /// A backslash followed by a byte that is not a JSON escape.
    InvalidEscape(u8),
    /// A malformed `\uXXXX` sequence or an unpaired surrogate.
    InvalidUnicodeEscape,
    /// String contents are not valid UTF-8.
    InvalidUtf8,
    /// A number such as `01` or `-012`.
    NumberWithLeadingZero,
    /// A number that breaks the JSON number grammar.
    InvalidNumber,
    /// More than [`crate::MAX_DEPTH`] nested arrays/objects.
    TooManyNestedArraysOrDictionaries,
    /// Something other than whitespace after the top-level value.
    TrailingData,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::UnexpectedEndOfFile => write!(f, "unexpected end of file"),
            ParseErrorKind::UnexpectedCharacter(c) => {
                write!(f, "unexpected character {}", describe_byte(*c))
            }
            ParseErrorKind::UnescapedControlCharacterInString(c) => {
                write!(f, "unescaped control character 0x{c:02x} in string")
            }
            ParseErrorKind::UnexpectedEndOfString => write!(f, "unexpected end of string"),
            ParseErrorKind::InvalidEscape(c) => {
                write!(f, "invalid escape sequence \\{}", describe_byte(*c))
            }
            ParseErrorKind::InvalidUnicodeEscape => write!(f, "invalid unicode escape"),
            ParseErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8"),
            ParseErrorKind::NumberWithLeadingZero => write!(f, "number with leading zero"),
            ParseErrorKind::InvalidNumber => write!(f, "invalid number"),
            ParseErrorKind::TooManyNestedArraysOrDictionaries => {
                write!(f, "too many nested arrays or dictionaries")
            }
            ParseErrorKind::TrailingData => write!(f, "unexpected data after top-level value"),
        }
    }
}

fn describe_byte(c: u8) -> String {
    if c.is_ascii_graphic() {
        format!("'{}'", c as char)
    } else {
        format!("0x{c:02x}")
    }
}

/// A structural parse failure, with the byte offset it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}
