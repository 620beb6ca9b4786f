//! Recursive-descent JSON reader producing [`JsonValue`].
//!
//! Reads a byte slice with an explicit cursor. Numbers are validated but kept
//! as text. Two deliberate quirks: a trailing comma before `]` or `}` is
//! accepted, and a leading UTF-8 byte-order mark is skipped.

use crate::error::{ParseError, ParseErrorKind};
use crate::number::{scan_number, JsonNumber};
use crate::value::{JsonObject, JsonValue};

/// Maximum number of nested arrays/objects.
pub const MAX_DEPTH: usize = 512;

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct JsonDecoder<'a> {
    data: &'a [u8],
    x: usize,
    depth: usize,
}

impl<'a> JsonDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        let x = if data.starts_with(BOM) { BOM.len() } else { 0 };
        Self { data, x, depth: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Reads exactly one document: a value surrounded by optional whitespace.
    pub fn decode(mut self) -> Result<JsonValue, ParseError> {
        let value = self.read_any()?;
        self.skip_whitespace();
        if self.x < self.data.len() {
            return Err(self.error(ParseErrorKind::TrailingData));
        }
        Ok(value)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.x)
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.x).copied()
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.x += 1;
        }
    }

    pub fn read_any(&mut self) -> Result<JsonValue, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error(ParseErrorKind::UnexpectedEndOfFile)),
            Some(b'"') => Ok(JsonValue::String(self.read_str()?)),
            Some(b'[') => self.read_arr(),
            Some(b'{') => self.read_obj(),
            Some(b't') => self.read_literal(b"true", JsonValue::Bool(true)),
            Some(b'f') => self.read_literal(b"false", JsonValue::Bool(false)),
            Some(b'n') => self.read_literal(b"null", JsonValue::Null),
            Some(b'-' | b'0'..=b'9') => self.read_num(),
            Some(c) => Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
        }
    }

    /// A misspelled literal is reported at its first byte.
    fn read_literal(&mut self, word: &[u8], value: JsonValue) -> Result<JsonValue, ParseError> {
        let start = self.x;
        for &expected in word {
            match self.peek() {
                Some(c) if c == expected => self.x += 1,
                Some(_) => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedCharacter(self.data[start]),
                        start,
                    ))
                }
                None => return Err(self.error(ParseErrorKind::UnexpectedEndOfFile)),
            }
        }
        Ok(value)
    }

    pub fn read_num(&mut self) -> Result<JsonValue, ParseError> {
        let start = self.x;
        let end = scan_number(self.data, start)?;
        self.x = end;
        // The grammar only admits ASCII, so this cannot fail.
        let text = std::str::from_utf8(&self.data[start..end])
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidNumber, start))?;
        Ok(JsonValue::Number(JsonNumber::from_raw(text.to_owned())))
    }

    pub fn read_str(&mut self) -> Result<String, ParseError> {
        if self.peek() != Some(b'"') {
            return Err(match self.peek() {
                Some(c) => self.error(ParseErrorKind::UnexpectedCharacter(c)),
                None => self.error(ParseErrorKind::UnexpectedEndOfFile),
            });
        }
        let start = self.x;
        self.x += 1;
        let mut out: Vec<u8> = Vec::new();
        let mut run_start = self.x;
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error(ParseErrorKind::UnexpectedEndOfString));
            };
            match c {
                b'"' => {
                    out.extend_from_slice(&self.data[run_start..self.x]);
                    self.x += 1;
                    break;
                }
                b'\\' => {
                    out.extend_from_slice(&self.data[run_start..self.x]);
                    self.read_escape(&mut out)?;
                    run_start = self.x;
                }
                c if c < 0x20 => {
                    return Err(self.error(ParseErrorKind::UnescapedControlCharacterInString(c)));
                }
                _ => self.x += 1,
            }
        }
        String::from_utf8(out).map_err(|_| ParseError::new(ParseErrorKind::InvalidUtf8, start))
    }

    /// Cursor is on the backslash.
    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<(), ParseError> {
        self.x += 1;
        let Some(c) = self.peek() else {
            return Err(self.error(ParseErrorKind::UnexpectedEndOfString));
        };
        let simple = match c {
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            b'/' => Some(b'/'),
            b'b' => Some(0x08),
            b'f' => Some(0x0c),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            b'u' => None,
            other => return Err(self.error(ParseErrorKind::InvalidEscape(other))),
        };
        if let Some(byte) = simple {
            out.push(byte);
            self.x += 1;
            return Ok(());
        }
        let escape_start = self.x - 1;
        self.x += 1;
        let first = self.read_hex4()?;
        let code = if (0xD800..0xDC00).contains(&first) {
            // High surrogate: a `\uDC00`..`\uDFFF` must follow.
            if self.data.get(self.x) != Some(&b'\\') || self.data.get(self.x + 1) != Some(&b'u') {
                return Err(ParseError::new(ParseErrorKind::InvalidUnicodeEscape, escape_start));
            }
            self.x += 2;
            let second = self.read_hex4()?;
            if !(0xDC00..0xE000).contains(&second) {
                return Err(ParseError::new(ParseErrorKind::InvalidUnicodeEscape, escape_start));
            }
            0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
        } else if (0xDC00..0xE000).contains(&first) {
            return Err(ParseError::new(ParseErrorKind::InvalidUnicodeEscape, escape_start));
        } else {
            first
        };
        let ch = char::from_u32(code)
            .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidUnicodeEscape, escape_start))?;
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        Ok(())
    }

    fn read_hex4(&mut self) -> Result<u32, ParseError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let Some(c) = self.peek() else {
                return Err(self.error(ParseErrorKind::UnexpectedEndOfString));
            };
            let digit = (c as char)
                .to_digit(16)
                .ok_or_else(|| self.error(ParseErrorKind::InvalidUnicodeEscape))?;
            code = (code << 4) | digit;
            self.x += 1;
        }
        Ok(code)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(ParseErrorKind::TooManyNestedArraysOrDictionaries));
        }
        Ok(())
    }

    pub fn read_arr(&mut self) -> Result<JsonValue, ParseError> {
        self.enter()?;
        self.x += 1;
        let mut arr = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnexpectedEndOfFile)),
                Some(b']') => {
                    self.x += 1;
                    break;
                }
                Some(_) => {}
            }
            arr.push(self.read_any()?);
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnexpectedEndOfFile)),
                Some(b',') => self.x += 1,
                Some(b']') => {
                    self.x += 1;
                    break;
                }
                Some(c) => return Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
            }
        }
        self.depth -= 1;
        Ok(JsonValue::Array(arr))
    }

    pub fn read_obj(&mut self) -> Result<JsonValue, ParseError> {
        self.enter()?;
        self.x += 1;
        let mut obj = JsonObject::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnexpectedEndOfFile)),
                Some(b'}') => {
                    self.x += 1;
                    break;
                }
                Some(_) => {}
            }
            let key = self.read_str()?;
            self.skip_whitespace();
            match self.peek() {
                Some(b':') => self.x += 1,
                Some(c) => return Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
                None => return Err(self.error(ParseErrorKind::UnexpectedEndOfFile)),
            }
            let val = self.read_any()?;
            obj.insert(key, val);
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnexpectedEndOfFile)),
                Some(b',') => self.x += 1,
                Some(b'}') => {
                    self.x += 1;
                    break;
                }
                Some(c) => return Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
            }
        }
        self.depth -= 1;
        Ok(JsonValue::Object(obj))
    }
}

/// Parses a complete JSON document.
pub fn parse(data: &[u8]) -> Result<JsonValue, ParseError> {
    JsonDecoder::new(data).decode()
}

/// [`parse`] over a `&str`.
pub fn parse_str(text: &str) -> Result<JsonValue, ParseError> {
    parse(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_at(input: &str) -> (ParseErrorKind, usize) {
        let err = parse_str(input).unwrap_err();
        (err.kind, err.offset)
    }

    #[test]
    fn scalars() {
        assert_eq!(parse_str("null").unwrap(), JsonValue::Null);
        assert_eq!(parse_str(" true ").unwrap(), JsonValue::Bool(true));
        assert_eq!(parse_str("\"hi\"").unwrap(), JsonValue::from("hi"));
        let n = parse_str("3.1400").unwrap();
        assert_eq!(n.as_number().unwrap().as_str(), "3.1400");
    }

    #[test]
    fn escapes_and_surrogates() {
        let v = parse_str(r#""a\"b\\c\/d\b\f\n\r\té😀""#).unwrap();
        assert_eq!(v.as_str().unwrap(), "a\"b\\c/d\u{8}\u{c}\n\r\té😀");
        assert_eq!(
            kind_at(r#""\ud83d""#),
            (ParseErrorKind::InvalidUnicodeEscape, 1)
        );
        assert_eq!(kind_at(r#""\x""#), (ParseErrorKind::InvalidEscape(b'x'), 2));
    }

    #[test]
    fn control_character_in_string_is_fatal() {
        assert_eq!(
            kind_at("\"ab\ncd\""),
            (ParseErrorKind::UnescapedControlCharacterInString(b'\n'), 3)
        );
    }

    #[test]
    fn trailing_commas_are_tolerated() {
        let v = parse_str("[1,2,]").unwrap();
        assert_eq!(v.as_array().unwrap().len(), 2);
        let v = parse_str(r#"{"a":1,}"#).unwrap();
        assert_eq!(v.get("a").and_then(JsonValue::as_i64), Some(1));
        assert!(parse_str("[1,,2]").is_err());
        assert!(parse_str("[,]").is_err());
    }

    #[test]
    fn not_json_fails_at_byte_zero() {
        assert_eq!(kind_at("not json"), (ParseErrorKind::UnexpectedCharacter(b'n'), 0));
        assert_eq!(kind_at("xyz").1, 0);
    }

    #[test]
    fn trailing_data_is_rejected() {
        assert_eq!(kind_at("{} x"), (ParseErrorKind::TrailingData, 3));
        assert!(parse_str("{}  \n").is_ok());
    }

    #[test]
    fn depth_limit() {
        let ok = format!("{}{}", "[".repeat(512), "]".repeat(512));
        assert!(parse_str(&ok).is_ok());
        let deep = format!("{}{}", "[".repeat(513), "]".repeat(513));
        assert_eq!(
            kind_at(&deep),
            (ParseErrorKind::TooManyNestedArraysOrDictionaries, 512)
        );
    }

    #[test]
    fn bom_is_skipped() {
        assert_eq!(parse(b"\xEF\xBB\xBF[1]").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let v = parse_str(r#"{"a":1,"a":2}"#).unwrap();
        assert_eq!(v.get("a").and_then(JsonValue::as_i64), Some(2));
    }
}
