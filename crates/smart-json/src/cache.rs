//! Snapshot stack mirroring model decode recursion.
//!
//! Each model being decoded owns one [`Snapshot`] on the stack: its schema
//! and, once some field first needs one, the JSON form of every field of
//! `T::default()`. A cache belongs to exactly one decode call and is never
//! shared between threads.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use smart_json_value::{JsonObject, JsonValue};

use crate::model::SmartCodable;
use crate::schema::Schema;

struct Snapshot {
    type_id: TypeId,
    type_name: &'static str,
    schema: Arc<Schema>,
    capture: fn() -> Option<JsonObject>,
    defaults: Option<Option<JsonObject>>,
    seeded: bool,
}

impl Snapshot {
    fn defaults(&mut self) -> Option<&JsonObject> {
        if self.defaults.is_none() {
            let captured = (self.capture)();
            tracing::trace!(
                model = self.type_name,
                fields = captured.as_ref().map_or(0, |d| d.len()),
                "captured defaults"
            );
            self.defaults = Some(captured);
        }
        self.defaults.as_ref().and_then(Option::as_ref)
    }
}

fn capture_defaults<T: SmartCodable>() -> Option<JsonObject> {
    match crate::encoder::raw_fields(&T::default()) {
        Ok(fields) => Some(fields),
        Err(error) => {
            tracing::debug!(model = std::any::type_name::<T>(), %error, "default instance not encodable");
            None
        }
    }
}

#[derive(Default)]
pub(crate) struct DecodingCache {
    stack: Vec<Snapshot>,
    schemas: HashMap<TypeId, Arc<Schema>>,
}

impl DecodingCache {
    fn schema_of<T: SmartCodable>(&mut self) -> Arc<Schema> {
        self.schemas
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(T::schema()))
            .clone()
    }

    pub(crate) fn push<T: SmartCodable>(&mut self) {
        self.push_snapshot::<T>(None);
    }

    /// Pushes a snapshot whose defaults are `defaults` instead of the
    /// type's default instance.
    pub(crate) fn push_seeded<T: SmartCodable>(&mut self, defaults: JsonObject) {
        self.push_snapshot::<T>(Some(defaults));
    }

    fn push_snapshot<T: SmartCodable>(&mut self, seed: Option<JsonObject>) {
        let schema = self.schema_of::<T>();
        let seeded = seed.is_some();
        tracing::trace!(model = std::any::type_name::<T>(), depth = self.depth(), "push snapshot");
        self.stack.push(Snapshot {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            schema,
            capture: capture_defaults::<T>,
            defaults: seed.map(Some),
            seeded,
        });
    }

    pub(crate) fn pop<T: SmartCodable>(&mut self) {
        let popped = self.stack.pop();
        debug_assert!(
            popped.as_ref().map(|s| s.type_id) == Some(TypeId::of::<T>()),
            "snapshot stack out of step with decode recursion"
        );
        tracing::trace!(model = std::any::type_name::<T>(), depth = self.depth(), "pop snapshot");
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Schema of the model currently being decoded.
    pub(crate) fn schema(&self) -> Arc<Schema> {
        self.stack
            .last()
            .map(|s| Arc::clone(&s.schema))
            .unwrap_or_default()
    }

    /// JSON form of `key`'s default value in the current model.
    pub(crate) fn default_for(&mut self, key: &str) -> Option<JsonValue> {
        self.stack
            .last_mut()
            .and_then(|s| s.defaults())
            .and_then(|defaults| defaults.get(key).cloned())
    }

    /// `true` while decoding a model whose defaults were seeded, as done by
    /// [`crate::update`].
    pub(crate) fn is_seeded(&self) -> bool {
        self.stack.last().is_some_and(|s| s.seeded)
    }
}
