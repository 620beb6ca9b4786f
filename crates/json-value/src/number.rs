//! Textual JSON numbers with lazy conversion.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{ParseError, ParseErrorKind};

/// A JSON number kept in its original textual form.
///
/// Conversion to a concrete numeric type only happens when a consumer asks
/// for one, so integers wider than `f64` precision survive a parse/write
/// cycle untouched.
#[derive(Clone, Eq)]
pub struct JsonNumber(String);

impl JsonNumber {
    /// Wraps text that is already known to follow the JSON number grammar.
    pub(crate) fn from_raw(text: String) -> Self {
        Self(text)
    }

    /// Validates `text` against the JSON number grammar.
    pub fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        match scan_number(bytes, 0) {
            Ok(end) if end == bytes.len() => Some(Self(text.to_owned())),
            _ => None,
        }
    }

    /// Shortest round-tripping representation of a finite `f64`.
    ///
    /// Returns `None` for infinities and NaN, which JSON cannot express.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let mut buf = ryu::Buffer::new();
        Some(Self(buf.format_finite(value).to_owned()))
    }

    /// Same as [`JsonNumber::from_f64`] but formatted at `f32` precision.
    pub fn from_f32(value: f32) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let mut buf = ryu::Buffer::new();
        Some(Self(buf.format_finite(value).to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// `true` when the text has neither a fraction nor an exponent.
    pub fn is_integer(&self) -> bool {
        !self.0.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
    }

    pub fn as_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.0.parse().ok()
        } else {
            None
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        if self.is_integer() {
            self.0.parse().ok()
        } else {
            None
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        if self.is_integer() {
            self.0.parse().ok()
        } else {
            None
        }
    }

    /// Any valid JSON number converts, possibly losing precision or
    /// saturating to an infinity for out-of-range exponents.
    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }

    /// Integer value of a number written with a fraction or exponent, when
    /// that value is exactly integral (`7.0`, `1e3`).
    pub fn as_integral_i64(&self) -> Option<i64> {
        if let Some(v) = self.as_i64() {
            return Some(v);
        }
        let f = self.as_f64()?;
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            Some(f as i64)
        } else {
            None
        }
    }

    /// Trailing-zero-free form: `3.1400` becomes `3.14`, `1.0` becomes `1`.
    pub fn normalized(&self) -> JsonNumber {
        if self.is_integer() {
            return self.clone();
        }
        match self.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                let mut buf = itoa::Buffer::new();
                JsonNumber(buf.format(f as i64).to_owned())
            }
            Some(f) => JsonNumber::from_f64(f).unwrap_or_else(|| self.clone()),
            None => self.clone(),
        }
    }
}

macro_rules! number_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for JsonNumber {
                fn from(value: $t) -> Self {
                    let mut buf = itoa::Buffer::new();
                    JsonNumber(buf.format(value).to_owned())
                }
            }
        )*
    };
}

number_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl PartialEq for JsonNumber {
    /// Numbers compare by value, not by spelling: `1.50 == 1.5`.
    fn eq(&self, other: &Self) -> bool {
        if self.0 == other.0 {
            return true;
        }
        if self.is_integer() && other.is_integer() {
            if let (Some(a), Some(b)) = (self.as_i128(), other.as_i128()) {
                return a == b;
            }
        }
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for JsonNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_i128(), other.as_i128()) {
            return Some(a.cmp(&b));
        }
        self.as_f64()?.partial_cmp(&other.as_f64()?)
    }
}

impl fmt::Debug for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonNumber({})", self.0)
    }
}

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scans one JSON number starting at `start` and returns its end offset.
///
/// Grammar: `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
pub(crate) fn scan_number(data: &[u8], start: usize) -> Result<usize, ParseError> {
    let len = data.len();
    let mut x = start;
    if x < len && data[x] == b'-' {
        x += 1;
    }
    match data.get(x) {
        Some(b'0') => {
            x += 1;
            if x < len && data[x].is_ascii_digit() {
                return Err(ParseError::new(ParseErrorKind::NumberWithLeadingZero, start));
            }
        }
        Some(b'1'..=b'9') => {
            while x < len && data[x].is_ascii_digit() {
                x += 1;
            }
        }
        Some(_) => return Err(ParseError::new(ParseErrorKind::InvalidNumber, x)),
        None => return Err(ParseError::new(ParseErrorKind::UnexpectedEndOfFile, x)),
    }
    if x < len && data[x] == b'.' {
        x += 1;
        let digits = x;
        while x < len && data[x].is_ascii_digit() {
            x += 1;
        }
        if x == digits {
            return Err(ParseError::new(ParseErrorKind::InvalidNumber, x));
        }
    }
    if x < len && (data[x] == b'e' || data[x] == b'E') {
        x += 1;
        if x < len && (data[x] == b'+' || data[x] == b'-') {
            x += 1;
        }
        let digits = x;
        while x < len && data[x].is_ascii_digit() {
            x += 1;
        }
        if x == digits {
            return Err(ParseError::new(ParseErrorKind::InvalidNumber, x));
        }
    }
    Ok(x)
}
