//! Binary payloads and colours, the two value types carried as strings.

use std::fmt;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::config::DataStrategy;

/// Raw bytes, written to JSON as a base64 string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Data(pub Vec<u8>);

impl Data {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn from_base64(text: &str, strategy: DataStrategy) -> Option<Self> {
        let decoded = match strategy {
            DataStrategy::Base64 => STANDARD.decode(text),
            DataStrategy::Base64UrlSafe => URL_SAFE_NO_PAD.decode(text.trim_end_matches('=')),
        };
        decoded.ok().map(Data)
    }

    pub fn to_base64(&self, strategy: DataStrategy) -> String {
        match strategy {
            DataStrategy::Base64 => STANDARD.encode(&self.0),
            DataStrategy::Base64UrlSafe => URL_SAFE_NO_PAD.encode(&self.0),
        }
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Data(bytes)
    }
}

/// An sRGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Default for Color {
    /// Opaque black.
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl Color {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 255)
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Reads `RGB`, `RRGGBB` or `RRGGBBAA`, optionally prefixed with `#` or
    /// `0x`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let text = text.trim();
        let digits = text
            .strip_prefix('#')
            .or_else(|| text.strip_prefix("0x"))
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 => {
                let short = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// `RRGGBB`, or `RRGGBBAA` when not fully opaque, uppercase, after
    /// `prefix`.
    pub fn to_hex(&self, prefix: &str) -> String {
        if self.alpha == 255 {
            format!("{prefix}{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
        } else {
            format!(
                "{prefix}{:02X}{:02X}{:02X}{:02X}",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex("#"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        assert_eq!(Color::from_hex("#F80"), Some(Color::rgb(0xFF, 0x88, 0x00)));
        assert_eq!(Color::from_hex("0x336699"), Some(Color::rgb(0x33, 0x66, 0x99)));
        assert_eq!(
            Color::from_hex("33669980"),
            Some(Color::rgba(0x33, 0x66, 0x99, 0x80))
        );
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GGHHII"), None);
        assert_eq!(Color::rgb(1, 2, 255).to_string(), "#0102FF");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex("0x"), "0x01020304");
    }

    #[test]
    fn base64_alphabets() {
        let data = Data(vec![0xfb, 0xff, 0x01]);
        assert_eq!(data.to_base64(DataStrategy::Base64), "+/8B");
        assert_eq!(data.to_base64(DataStrategy::Base64UrlSafe), "-_8B");
        assert_eq!(Data::from_base64("+/8B", DataStrategy::Base64), Some(data.clone()));
        assert_eq!(Data::from_base64("-_8B", DataStrategy::Base64UrlSafe), Some(data));
        assert_eq!(Data::from_base64("not base64!", DataStrategy::Base64), None);
    }
}
