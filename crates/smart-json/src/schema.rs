//! Per-field metadata of a model: renames, transformers, ignored and
//! flattened fields.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::transformer::{ErasedTransformer, ValueTransformer};

#[derive(Clone, Default)]
struct FieldRule {
    alternates: Vec<String>,
    transformer: Option<Arc<dyn ErasedTransformer>>,
    ignored: bool,
    flattened: bool,
}

/// Field metadata returned by [`SmartCodable::schema`](crate::SmartCodable::schema).
///
/// ```
/// use smart_json::{Schema, transformer::HexColorTransformer};
///
/// let schema = Schema::builder()
///     .rename("name", ["nickName", "realName"])
///     .rename("city", ["address.city"])
///     .transform("tint", HexColorTransformer::default())
///     .ignore("cache")
///     .build();
/// assert_eq!(schema.alternates("name"), ["nickName", "realName"]);
/// assert!(schema.is_ignored("cache"));
/// ```
#[derive(Clone, Default)]
pub struct Schema {
    fields: IndexMap<String, FieldRule>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Source keys tried for `field`, in order. Entries may be dotted paths.
    pub fn alternates(&self, field: &str) -> &[String] {
        self.fields
            .get(field)
            .map(|rule| rule.alternates.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_ignored(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|rule| rule.ignored)
    }

    pub fn is_flattened(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|rule| rule.flattened)
    }

    pub(crate) fn transformer(&self, field: &str) -> Option<&Arc<dyn ErasedTransformer>> {
        self.fields
            .get(field)
            .and_then(|rule| rule.transformer.as_ref())
    }

    /// `(field, alternates)` for every renamed field, in declaration order.
    pub fn renames(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .filter(|(_, rule)| !rule.alternates.is_empty())
            .map(|(field, rule)| (field.as_str(), rule.alternates.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (field, rule) in &self.fields {
            map.entry(
                field,
                &format_args!(
                    "alternates={:?} transformer={} ignored={} flattened={}",
                    rule.alternates,
                    rule.transformer.is_some(),
                    rule.ignored,
                    rule.flattened
                ),
            );
        }
        map.finish()
    }
}

#[derive(Default)]
pub struct SchemaBuilder {
    fields: IndexMap<String, FieldRule>,
}

impl SchemaBuilder {
    fn rule(&mut self, field: &str) -> &mut FieldRule {
        self.fields.entry(field.to_owned()).or_default()
    }

    /// Reads `field` from the first of `alternates` holding a non-null
    /// value. Unless `field` itself is listed, its own key is no longer
    /// read.
    pub fn rename<I, S>(mut self, field: &str, alternates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule(field)
            .alternates
            .extend(alternates.into_iter().map(Into::into));
        self
    }

    pub fn transform<T: ValueTransformer>(mut self, field: &str, transformer: T) -> Self {
        self.rule(field).transformer = Some(Arc::new(transformer));
        self
    }

    /// The field always keeps its default value and is never written out.
    pub fn ignore(mut self, field: &str) -> Self {
        self.rule(field).ignored = true;
        self
    }

    /// The field's own fields are read from, and written into, the
    /// enclosing object.
    pub fn flatten(mut self, field: &str) -> Self {
        self.rule(field).flattened = true;
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}
