use crate::value::Value;
use derive_more::Display;
use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);
static NULL: Value = Value::Null;

///
/// DocumentHandle
///
/// Process-unique identity of one in-memory document.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("#{_0}")]
pub struct DocumentHandle(u64);

impl DocumentHandle {
    fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

///
/// Document
///
/// Snapshot of one mapped object: its class and current field values.
/// Clones share the handle, so a clone is the same object for equality and
/// ledger lookups.
///

#[derive(Clone, Debug)]
pub struct Document {
    handle: DocumentHandle,
    class_name: String,
    fields: BTreeMap<String, Value>,
}

impl Document {
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            handle: DocumentHandle::next(),
            class_name: class_name.into(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Current value of a field; unset fields read as `Null`.
    #[must_use]
    pub fn field(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&NULL)
    }

    #[must_use]
    pub const fn handle(&self) -> DocumentHandle {
        self.handle
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Document(Arc::new(self))
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for Document {}
