//! Date strategies and the parsing/formatting behind them.

use std::fmt;
use std::sync::Arc;

use smart_json_value::{JsonNumber, JsonValue};
use time::format_description::well_known::{Iso8601, Rfc2822, Rfc3339};
use time::{format_description, Date, OffsetDateTime, PrimitiveDateTime};

/// Caller-supplied date reader.
pub type DateParser = Arc<dyn Fn(&JsonValue) -> Option<OffsetDateTime> + Send + Sync>;

/// Caller-supplied date writer.
pub type DateFormatter = Arc<dyn Fn(&OffsetDateTime) -> Option<JsonValue> + Send + Sync>;

/// Formats tried, in order, when nothing more specific matched.
const HEURISTIC_FORMATS: &[&str] = &[
    "[year]-[month]-[day] [hour]:[minute]:[second]",
    "[year]-[month]-[day]T[hour]:[minute]:[second]",
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]",
    "[year]-[month]-[day] [hour]:[minute]",
    "[year]-[month]-[day]",
    "[year]/[month]/[day] [hour]:[minute]:[second]",
    "[year]/[month]/[day]",
    "[day].[month].[year]",
];

/// Timestamps above this magnitude are read as milliseconds by the
/// heuristic (`1e11` seconds is past the year 5000).
const MILLIS_THRESHOLD: f64 = 1e11;

#[derive(Clone, Default)]
pub enum DateDecodingStrategy {
    /// Timestamps (seconds or milliseconds by magnitude) and a list of
    /// common textual formats.
    #[default]
    Heuristic,
    SecondsSince1970,
    MillisecondsSince1970,
    /// RFC 3339 first, then the wider ISO 8601 grammar.
    Iso8601,
    /// A `time` format description such as `"[year]-[month]-[day]"`.
    Formatted(String),
    Custom(DateParser),
}

impl fmt::Debug for DateDecodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateDecodingStrategy::Heuristic => f.write_str("Heuristic"),
            DateDecodingStrategy::SecondsSince1970 => f.write_str("SecondsSince1970"),
            DateDecodingStrategy::MillisecondsSince1970 => f.write_str("MillisecondsSince1970"),
            DateDecodingStrategy::Iso8601 => f.write_str("Iso8601"),
            DateDecodingStrategy::Formatted(format) => f.debug_tuple("Formatted").field(format).finish(),
            DateDecodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl DateDecodingStrategy {
    /// Applies the strategy, falling back to the heuristic when it fails.
    pub fn decode(&self, value: &JsonValue) -> Option<OffsetDateTime> {
        let direct = match self {
            DateDecodingStrategy::Heuristic => None,
            DateDecodingStrategy::SecondsSince1970 => timestamp(value).and_then(from_seconds),
            DateDecodingStrategy::MillisecondsSince1970 => {
                timestamp(value).and_then(|ms| from_seconds(ms / 1000.0))
            }
            DateDecodingStrategy::Iso8601 => value.as_str().and_then(parse_iso8601),
            DateDecodingStrategy::Formatted(format) => {
                value.as_str().and_then(|text| parse_formatted(text, format))
            }
            DateDecodingStrategy::Custom(parser) => parser(value),
        };
        direct.or_else(|| heuristic(value))
    }
}

#[derive(Clone, Default)]
pub enum DateEncodingStrategy {
    SecondsSince1970,
    MillisecondsSince1970,
    /// RFC 3339.
    #[default]
    Iso8601,
    Formatted(String),
    Custom(DateFormatter),
}

impl fmt::Debug for DateEncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateEncodingStrategy::SecondsSince1970 => f.write_str("SecondsSince1970"),
            DateEncodingStrategy::MillisecondsSince1970 => f.write_str("MillisecondsSince1970"),
            DateEncodingStrategy::Iso8601 => f.write_str("Iso8601"),
            DateEncodingStrategy::Formatted(format) => f.debug_tuple("Formatted").field(format).finish(),
            DateEncodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl DateEncodingStrategy {
    pub fn encode(&self, date: &OffsetDateTime) -> Option<JsonValue> {
        match self {
            DateEncodingStrategy::SecondsSince1970 => {
                number(date.unix_timestamp_nanos() as f64 / 1e9)
            }
            DateEncodingStrategy::MillisecondsSince1970 => {
                number(date.unix_timestamp_nanos() as f64 / 1e6)
            }
            DateEncodingStrategy::Iso8601 => date.format(&Rfc3339).ok().map(JsonValue::String),
            DateEncodingStrategy::Formatted(format) => {
                format_with(date, format).map(JsonValue::String)
            }
            DateEncodingStrategy::Custom(formatter) => formatter(date),
        }
    }
}

fn number(value: f64) -> Option<JsonValue> {
    JsonNumber::from_f64(value).map(|n| JsonValue::Number(n.normalized()))
}

/// Numeric value of a number or of a string holding one.
fn timestamp(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(text) => JsonNumber::parse(text.trim()).and_then(|n| n.as_f64()),
        _ => None,
    }
}

pub(crate) fn from_seconds(seconds: f64) -> Option<OffsetDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let nanos = (seconds * 1e9).round() as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
}

pub(crate) fn parse_iso8601(text: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(text, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(text, &Iso8601::DEFAULT))
        .ok()
}

/// Parses with a format description. Descriptions without an offset are
/// read as UTC, descriptions without a time as midnight.
pub(crate) fn parse_formatted(text: &str, format: &str) -> Option<OffsetDateTime> {
    let items = format_description::parse_borrowed::<2>(format).ok()?;
    if let Ok(date) = OffsetDateTime::parse(text, &items[..]) {
        return Some(date);
    }
    if let Ok(date) = PrimitiveDateTime::parse(text, &items[..]) {
        return Some(date.assume_utc());
    }
    Date::parse(text, &items[..])
        .ok()
        .map(|date| date.midnight().assume_utc())
}

pub(crate) fn format_with(date: &OffsetDateTime, format: &str) -> Option<String> {
    let items = format_description::parse_borrowed::<2>(format).ok()?;
    date.format(&items[..]).ok()
}

/// Last-resort reading of anything that looks like a date.
pub(crate) fn heuristic(value: &JsonValue) -> Option<OffsetDateTime> {
    if let Some(ts) = timestamp(value) {
        return if ts.abs() >= MILLIS_THRESHOLD {
            from_seconds(ts / 1000.0)
        } else {
            from_seconds(ts)
        };
    }
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    parse_iso8601(text)
        .or_else(|| OffsetDateTime::parse(text, &Rfc2822).ok())
        .or_else(|| {
            HEURISTIC_FORMATS
                .iter()
                .find_map(|format| parse_formatted(text, format))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn heuristic_matrix() {
        let noon = datetime!(2024-03-01 12:00:00 UTC);
        for input in [
            JsonValue::from(1_709_294_400i64),
            JsonValue::from(1_709_294_400_000i64),
            JsonValue::from("1709294400"),
            JsonValue::from("2024-03-01T12:00:00Z"),
            JsonValue::from("2024-03-01 12:00:00"),
            JsonValue::from("2024/03/01 12:00:00"),
        ] {
            assert_eq!(heuristic(&input), Some(noon), "{input:?}");
        }
        assert_eq!(
            heuristic(&JsonValue::from("2024-03-01")),
            Some(datetime!(2024-03-01 0:00 UTC))
        );
        assert_eq!(heuristic(&JsonValue::from("soon")), None);
        assert_eq!(heuristic(&JsonValue::Bool(true)), None);
    }

    #[test]
    fn strategy_falls_back_to_heuristic() {
        let strategy = DateDecodingStrategy::Formatted("[day]/[month]/[year]".into());
        assert_eq!(
            strategy.decode(&JsonValue::from("01/03/2024")),
            Some(datetime!(2024-03-01 0:00 UTC))
        );
        assert_eq!(
            strategy.decode(&JsonValue::from("2024-03-01T00:00:00Z")),
            Some(datetime!(2024-03-01 0:00 UTC))
        );
    }

    #[test]
    fn format_descriptions_take_backslash_escapes() {
        let format = r"\[[year]-[month]-[day]\]";
        assert_eq!(
            parse_formatted("[2024-03-01]", format),
            Some(datetime!(2024-03-01 0:00 UTC))
        );
        assert_eq!(
            format_with(&datetime!(2024-03-01 12:00:00 UTC), format).as_deref(),
            Some("[2024-03-01]")
        );
        assert_eq!(parse_formatted("2024-03-01", "[year]-[month"), None);
    }

    #[test]
    fn encoding_strategies() {
        let date = datetime!(2024-03-01 12:00:00 UTC);
        assert_eq!(
            DateEncodingStrategy::Iso8601.encode(&date),
            Some(JsonValue::from("2024-03-01T12:00:00Z"))
        );
        assert_eq!(
            DateEncodingStrategy::SecondsSince1970.encode(&date),
            Some(JsonValue::from(1_709_294_400i64))
        );
        assert_eq!(
            DateEncodingStrategy::Formatted("[year]-[month]-[day]".into()).encode(&date),
            Some(JsonValue::from("2024-03-01"))
        );
    }
}
