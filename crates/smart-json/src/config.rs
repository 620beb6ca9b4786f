//! Decode and encode options.
//!
//! Options are plain values passed to each call. A process may install
//! its own defaults once at start-up with [`install_global_options`]; after
//! that, `DecodeOptions::default()` and `EncodeOptions::default()` start
//! from the installed values.

use std::sync::OnceLock;

use smart_json_sentinel::DebugLevel;
use smart_json_value::WriteOptions;

pub use crate::date::{DateDecodingStrategy, DateEncodingStrategy, DateFormatter, DateParser};

/// How JSON keys are rewritten before fields look them up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyDecodingStrategy {
    #[default]
    UseDefaultKeys,
    /// `user_name` is looked up as `userName`.
    FromSnakeCase,
    /// `UserName` is looked up as `userName`.
    FirstLetterLower,
    /// `userName` is looked up as `UserName`.
    FirstLetterUpper,
}

/// How field names are rewritten when written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEncodingStrategy {
    #[default]
    UseDefaultKeys,
    /// `userName` is written as `user_name`.
    ToSnakeCase,
    FirstLetterLower,
    FirstLetterUpper,
}

/// Binary data is always carried as a base64 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataStrategy {
    #[default]
    Base64,
    /// URL-safe alphabet, no padding.
    Base64UrlSafe,
}

/// Treatment of infinities and NaN, which JSON numbers cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NonConformingFloat {
    /// Encoding fails with [`crate::EncodeError::NonConformingFloat`];
    /// decoding accepts only real numbers.
    #[default]
    Throw,
    /// Non-finite values travel as these string tokens, both ways.
    ConvertToString {
        positive_infinity: String,
        negative_infinity: String,
        nan: String,
    },
}

impl NonConformingFloat {
    pub fn convert_to_string(
        positive_infinity: impl Into<String>,
        negative_infinity: impl Into<String>,
        nan: impl Into<String>,
    ) -> Self {
        NonConformingFloat::ConvertToString {
            positive_infinity: positive_infinity.into(),
            negative_infinity: negative_infinity.into(),
            nan: nan.into(),
        }
    }

    /// Tokens used for non-finite floats in captured defaults.
    pub(crate) fn raw() -> Self {
        Self::convert_to_string("+Infinity", "-Infinity", "NaN")
    }

    /// The float a token stands for, if this strategy converts tokens.
    pub fn decode_token(&self, text: &str) -> Option<f64> {
        match self {
            NonConformingFloat::Throw => None,
            NonConformingFloat::ConvertToString {
                positive_infinity,
                negative_infinity,
                nan,
            } => {
                if text == positive_infinity {
                    Some(f64::INFINITY)
                } else if text == negative_infinity {
                    Some(f64::NEG_INFINITY)
                } else if text == nan {
                    Some(f64::NAN)
                } else {
                    None
                }
            }
        }
    }

    /// The token for a non-finite float, if this strategy converts them.
    pub fn encode_token(&self, value: f64) -> Option<&str> {
        match self {
            NonConformingFloat::Throw => None,
            NonConformingFloat::ConvertToString {
                positive_infinity,
                negative_infinity,
                nan,
            } => {
                if value.is_nan() {
                    Some(nan)
                } else if value > 0.0 {
                    Some(positive_infinity)
                } else {
                    Some(negative_infinity)
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub key_strategy: KeyDecodingStrategy,
    pub date_strategy: DateDecodingStrategy,
    pub data_strategy: DataStrategy,
    pub non_conforming_float: NonConformingFloat,
    /// Numeric strings to numbers, numbers to strings, `"yes"`/`1` to
    /// bool and similar conversions.
    pub type_coercion: bool,
    /// Falls back to an ASCII case-insensitive key match when the exact key
    /// is absent.
    pub case_insensitive_keys: bool,
    /// Dotted path of the subtree to decode instead of the whole document.
    pub designated_path: Option<String>,
    /// Overrides the process-wide sentinel level for this call.
    pub debug_level: Option<DebugLevel>,
}

impl DecodeOptions {
    /// Library defaults, ignoring any installed global options.
    pub fn builtin() -> Self {
        Self {
            key_strategy: KeyDecodingStrategy::default(),
            date_strategy: DateDecodingStrategy::default(),
            data_strategy: DataStrategy::default(),
            non_conforming_float: NonConformingFloat::default(),
            type_coercion: true,
            case_insensitive_keys: false,
            designated_path: None,
            debug_level: None,
        }
    }

    pub fn with_key_strategy(mut self, strategy: KeyDecodingStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    pub fn with_date_strategy(mut self, strategy: DateDecodingStrategy) -> Self {
        self.date_strategy = strategy;
        self
    }

    pub fn with_data_strategy(mut self, strategy: DataStrategy) -> Self {
        self.data_strategy = strategy;
        self
    }

    pub fn with_non_conforming_float(mut self, strategy: NonConformingFloat) -> Self {
        self.non_conforming_float = strategy;
        self
    }

    pub fn with_type_coercion(mut self, enabled: bool) -> Self {
        self.type_coercion = enabled;
        self
    }

    pub fn with_case_insensitive_keys(mut self, enabled: bool) -> Self {
        self.case_insensitive_keys = enabled;
        self
    }

    pub fn with_designated_path(mut self, path: impl Into<String>) -> Self {
        self.designated_path = Some(path.into());
        self
    }

    pub fn with_debug_level(mut self, level: DebugLevel) -> Self {
        self.debug_level = Some(level);
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        match GLOBAL_OPTIONS.get() {
            Some(global) => global.decode.clone(),
            None => Self::builtin(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub key_strategy: KeyEncodingStrategy,
    pub date_strategy: DateEncodingStrategy,
    pub data_strategy: DataStrategy,
    pub non_conforming_float: NonConformingFloat,
    /// Emits the first declared alternate name instead of the field name.
    pub use_mapped_keys: bool,
    pub write: WriteOptions,
}

impl EncodeOptions {
    pub fn builtin() -> Self {
        Self {
            key_strategy: KeyEncodingStrategy::default(),
            date_strategy: DateEncodingStrategy::default(),
            data_strategy: DataStrategy::default(),
            non_conforming_float: NonConformingFloat::default(),
            use_mapped_keys: false,
            write: WriteOptions::default(),
        }
    }

    pub fn with_key_strategy(mut self, strategy: KeyEncodingStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    pub fn with_date_strategy(mut self, strategy: DateEncodingStrategy) -> Self {
        self.date_strategy = strategy;
        self
    }

    pub fn with_data_strategy(mut self, strategy: DataStrategy) -> Self {
        self.data_strategy = strategy;
        self
    }

    pub fn with_non_conforming_float(mut self, strategy: NonConformingFloat) -> Self {
        self.non_conforming_float = strategy;
        self
    }

    pub fn with_mapped_keys(mut self, enabled: bool) -> Self {
        self.use_mapped_keys = enabled;
        self
    }

    pub fn with_write_options(mut self, write: WriteOptions) -> Self {
        self.write = write;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.write.pretty = true;
        self
    }

    pub fn with_sorted_keys(mut self, sorted: bool) -> Self {
        self.write.sorted_keys = sorted;
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        match GLOBAL_OPTIONS.get() {
            Some(global) => global.encode.clone(),
            None => Self::builtin(),
        }
    }
}

struct GlobalOptions {
    decode: DecodeOptions,
    encode: EncodeOptions,
}

static GLOBAL_OPTIONS: OnceLock<GlobalOptions> = OnceLock::new();

/// Installs process-wide defaults. Only the first call takes effect; later
/// calls return `false`.
pub fn install_global_options(decode: DecodeOptions, encode: EncodeOptions) -> bool {
    GLOBAL_OPTIONS.set(GlobalOptions { decode, encode }).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defaults() {
        let options = DecodeOptions::builtin();
        assert!(options.type_coercion);
        assert!(!options.case_insensitive_keys);
        assert_eq!(options.key_strategy, KeyDecodingStrategy::UseDefaultKeys);
        assert_eq!(options.non_conforming_float, NonConformingFloat::Throw);
        assert!(!EncodeOptions::builtin().use_mapped_keys);
    }

    #[test]
    fn non_conforming_tokens() {
        let strategy = NonConformingFloat::convert_to_string("inf", "-inf", "nan");
        assert_eq!(strategy.decode_token("inf"), Some(f64::INFINITY));
        assert!(strategy.decode_token("nan").is_some_and(f64::is_nan));
        assert_eq!(strategy.decode_token("1.5"), None);
        assert_eq!(strategy.encode_token(f64::NEG_INFINITY), Some("-inf"));
        assert_eq!(NonConformingFloat::Throw.encode_token(f64::NAN), None);
    }
}
