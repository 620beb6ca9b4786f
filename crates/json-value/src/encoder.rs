//! Writes a [`JsonValue`] tree back to UTF-8 bytes.

use std::cmp::Ordering;

use crate::value::{JsonObject, JsonValue};

/// Output formatting switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Two-space indentation with newlines around array/object members and
    /// `": "` after keys.
    pub pretty: bool,
    /// Emit object keys in [`numeric_aware_cmp`] order instead of insertion
    /// order.
    pub sorted_keys: bool,
    /// Write `/` as `\/`.
    pub escape_slashes: bool,
}

impl WriteOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    pub fn with_sorted_keys(mut self, sorted: bool) -> Self {
        self.sorted_keys = sorted;
        self
    }

    pub fn with_escaped_slashes(mut self, escape: bool) -> Self {
        self.escape_slashes = escape;
        self
    }
}

pub struct JsonEncoder {
    options: WriteOptions,
    out: Vec<u8>,
}

impl JsonEncoder {
    pub fn new(options: WriteOptions) -> Self {
        Self {
            options,
            out: Vec::new(),
        }
    }

    pub fn encode(&mut self, value: &JsonValue) -> Vec<u8> {
        self.out.clear();
        self.write_any(value, 0);
        std::mem::take(&mut self.out)
    }

    fn write_any(&mut self, value: &JsonValue, depth: usize) {
        match value {
            JsonValue::Null => self.out.extend_from_slice(b"null"),
            JsonValue::Bool(true) => self.out.extend_from_slice(b"true"),
            JsonValue::Bool(false) => self.out.extend_from_slice(b"false"),
            JsonValue::Number(n) => self.out.extend_from_slice(n.as_str().as_bytes()),
            JsonValue::String(s) => self.write_str(s),
            JsonValue::Array(items) => self.write_arr(items, depth),
            JsonValue::Object(obj) => self.write_obj(obj, depth),
        }
    }

    fn newline(&mut self, depth: usize) {
        if self.options.pretty {
            self.out.push(b'\n');
            for _ in 0..depth {
                self.out.extend_from_slice(b"  ");
            }
        }
    }

    fn write_arr(&mut self, items: &[JsonValue], depth: usize) {
        if items.is_empty() {
            self.out.extend_from_slice(b"[]");
            return;
        }
        self.out.push(b'[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(b',');
            }
            self.newline(depth + 1);
            self.write_any(item, depth + 1);
        }
        self.newline(depth);
        self.out.push(b']');
    }

    fn write_obj(&mut self, obj: &JsonObject, depth: usize) {
        if obj.is_empty() {
            self.out.extend_from_slice(b"{}");
            return;
        }
        let mut entries: Vec<(&String, &JsonValue)> = obj.iter().collect();
        if self.options.sorted_keys {
            entries.sort_by(|a, b| numeric_aware_cmp(a.0, b.0));
        }
        self.out.push(b'{');
        for (i, (key, val)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.out.push(b',');
            }
            self.newline(depth + 1);
            self.write_str(key);
            if self.options.pretty {
                self.out.extend_from_slice(b": ");
            } else {
                self.out.push(b':');
            }
            self.write_any(val, depth + 1);
        }
        self.newline(depth);
        self.out.push(b'}');
    }

    fn write_str(&mut self, s: &str) {
        self.out.push(b'"');
        let bytes = s.as_bytes();
        let mut run_start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            let escape: Option<&[u8]> = match b {
                b'"' => Some(b"\\\"".as_slice()),
                b'\\' => Some(b"\\\\".as_slice()),
                b'/' if self.options.escape_slashes => Some(b"\\/".as_slice()),
                b'\n' => Some(b"\\n".as_slice()),
                b'\r' => Some(b"\\r".as_slice()),
                b'\t' => Some(b"\\t".as_slice()),
                0x08 => Some(b"\\b".as_slice()),
                0x0c => Some(b"\\f".as_slice()),
                0x00..=0x1f => None,
                _ => continue,
            };
            self.out.extend_from_slice(&bytes[run_start..i]);
            match escape {
                Some(seq) => self.out.extend_from_slice(seq),
                None => {
                    const HEX: &[u8; 16] = b"0123456789abcdef";
                    self.out.extend_from_slice(b"\\u00");
                    self.out.push(HEX[(b >> 4) as usize]);
                    self.out.push(HEX[(b & 0xf) as usize]);
                }
            }
            run_start = i + 1;
        }
        self.out.extend_from_slice(&bytes[run_start..]);
        self.out.push(b'"');
    }
}

/// Serializes `value` with the given options.
pub fn to_vec(value: &JsonValue, options: WriteOptions) -> Vec<u8> {
    JsonEncoder::new(options).encode(value)
}

/// Serializes `value` with the given options.
pub fn to_string(value: &JsonValue, options: WriteOptions) -> String {
    // The encoder only ever emits UTF-8.
    String::from_utf8(to_vec(value, options)).unwrap_or_default()
}

/// Locale-independent ordering where digit runs compare by numeric value:
/// `"item2" < "item10"`. Ties between numerically equal runs (`"01"` vs
/// `"1"`) fall back to plain byte order so the ordering is total.
pub fn numeric_aware_cmp(a: &str, b: &str) -> Ordering {
    let (ab, bb) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);
    while i < ab.len() && j < bb.len() {
        if ab[i].is_ascii_digit() && bb[j].is_ascii_digit() {
            let si = i;
            while i < ab.len() && ab[i].is_ascii_digit() {
                i += 1;
            }
            let sj = j;
            while j < bb.len() && bb[j].is_ascii_digit() {
                j += 1;
            }
            let da = trim_zeros(&ab[si..i]);
            let db = trim_zeros(&bb[sj..j]);
            let ord = da.len().cmp(&db.len()).then_with(|| da.cmp(db));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = ab[i].cmp(&bb[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }
    (ab.len() - i)
        .cmp(&(bb.len() - j))
        .then_with(|| ab.cmp(bb))
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let first = digits.iter().position(|&d| d != b'0').unwrap_or(digits.len());
    &digits[first..]
}
