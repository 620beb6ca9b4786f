//! Key strategies and schema-driven key remapping.

use std::borrow::Cow;

use smart_json_path::{find, parse_path};
use smart_json_value::{JsonObject, JsonValue};

use crate::config::{KeyDecodingStrategy, KeyEncodingStrategy};
use crate::schema::Schema;

/// `user_name` → `userName`. Leading and trailing underscores are kept,
/// inner words are capitalized and runs of underscores collapse.
pub fn from_snake_case(key: &str) -> Cow<'_, str> {
    let trimmed = key.trim_matches('_');
    if !trimmed.contains('_') {
        return Cow::Borrowed(key);
    }
    let leading = key.len() - key.trim_start_matches('_').len();
    let trailing = key.len() - key.trim_end_matches('_').len();
    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..leading]);
    for (i, word) in trimmed.split('_').filter(|w| !w.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    out.push_str(&key[key.len() - trailing..]);
    Cow::Owned(out)
}

/// `userName` → `user_name`, `URLString` → `url_string`.
pub fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn first_letter_lower(key: &str) -> Cow<'_, str> {
    map_first_letter(key, |c| c.is_lowercase(), |c, out| out.extend(c.to_lowercase()))
}

pub fn first_letter_upper(key: &str) -> Cow<'_, str> {
    map_first_letter(key, |c| c.is_uppercase(), |c, out| out.extend(c.to_uppercase()))
}

fn map_first_letter(
    key: &str,
    already: impl Fn(char) -> bool,
    convert: impl Fn(char, &mut String),
) -> Cow<'_, str> {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if !already(first) && first.is_alphabetic() => {
            let mut out = String::with_capacity(key.len());
            convert(first, &mut out);
            out.push_str(chars.as_str());
            Cow::Owned(out)
        }
        _ => Cow::Borrowed(key),
    }
}

impl KeyDecodingStrategy {
    pub fn apply<'a>(&self, key: &'a str) -> Cow<'a, str> {
        match self {
            KeyDecodingStrategy::UseDefaultKeys => Cow::Borrowed(key),
            KeyDecodingStrategy::FromSnakeCase => from_snake_case(key),
            KeyDecodingStrategy::FirstLetterLower => first_letter_lower(key),
            KeyDecodingStrategy::FirstLetterUpper => first_letter_upper(key),
        }
    }
}

impl KeyEncodingStrategy {
    pub fn apply<'a>(&self, key: &'a str) -> Cow<'a, str> {
        match self {
            KeyEncodingStrategy::UseDefaultKeys => Cow::Borrowed(key),
            KeyEncodingStrategy::ToSnakeCase => Cow::Owned(to_snake_case(key)),
            KeyEncodingStrategy::FirstLetterLower => first_letter_lower(key),
            KeyEncodingStrategy::FirstLetterUpper => first_letter_upper(key),
        }
    }
}

/// Rewrites an incoming object into the key space of a model's fields.
///
/// The key strategy is applied to every key first (the first of several
/// keys converting to the same name wins). Then each renamed field takes
/// the value of its first alternate that holds a non-null value. An
/// alternate names a source key: it is looked up in the incoming object
/// as written, then among the converted keys; one absent as a direct key
/// is tried as a dotted path. A field whose alternates do not list the
/// field itself loses its own key.
pub(crate) fn map_keys<'a>(
    object: &'a JsonObject,
    strategy: KeyDecodingStrategy,
    schema: &Schema,
) -> Cow<'a, JsonObject> {
    let mut mapped = match strategy {
        KeyDecodingStrategy::UseDefaultKeys => Cow::Borrowed(object),
        _ => {
            let mut converted = JsonObject::with_capacity(object.len());
            for (key, value) in object {
                let key = strategy.apply(key);
                if !converted.contains_key(key.as_ref()) {
                    converted.insert(key.into_owned(), value.clone());
                }
            }
            Cow::Owned(converted)
        }
    };

    for (field, alternates) in schema.renames() {
        let found = alternates
            .iter()
            .find_map(|alt| {
                lookup_alternate(object, alt).or_else(|| match &mapped {
                    Cow::Owned(converted) => lookup_alternate(converted, alt),
                    Cow::Borrowed(_) => None,
                })
            })
            .cloned();
        match found {
            Some(value) => {
                mapped.to_mut().insert(field.to_owned(), value);
            }
            None if !alternates.iter().any(|alt| alt == field) && mapped.contains_key(field) => {
                mapped.to_mut().shift_remove(field);
            }
            None => {}
        }
    }
    mapped
}

fn lookup_alternate<'a>(object: &'a JsonObject, alternate: &str) -> Option<&'a JsonValue> {
    let direct = match object.get(alternate) {
        Some(value) => Some(value),
        None if alternate.contains('.') => {
            let segments = parse_path(alternate).ok()?;
            let (head, rest) = segments.split_first()?;
            object.get(head.as_str()).and_then(|v| find(v, rest))
        }
        None => None,
    };
    direct.filter(|value| !value.is_null())
}
