//! In-memory values as seen by the persister.
//!
//! Equality is strict: documents compare by identity, everything else by
//! value. The update compiler relies on this for its `old != new` checks.
mod document;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, sync::Arc};
use ulid::Ulid;

// re-exports
pub use document::{Document, DocumentHandle};

///
/// Value
///

#[remain::sorted]
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    Bool(bool),
    Bytes(Vec<u8>),
    Date(DateTime<Utc>),
    Document(Arc<Document>),
    Float(f64),
    Hash(BTreeMap<String, Self>),
    Id(Ulid),
    Int(i64),
    List(Vec<Self>),
    #[default]
    Null,
    Text(String),
}

impl Value {
    /// Short variant label used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::Document(_) => "document",
            Self::Float(_) => "float",
            Self::Hash(_) => "hash",
            Self::Id(_) => "id",
            Self::Int(_) => "int",
            Self::List(_) => "list",
            Self::Null => "null",
            Self::Text(_) => "text",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_document(&self) -> Option<&Arc<Document>> {
        match self {
            Self::Document(doc) => Some(doc),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_hash(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Hash(map) => Some(map),
            _ => None,
        }
    }

    /// Build a list value from anything convertible.
    pub fn list<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Ulid> for Value {
    fn from(v: Ulid) -> Self {
        Self::Id(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Date(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl From<BTreeMap<String, Self>> for Value {
    fn from(v: BTreeMap<String, Self>) -> Self {
        Self::Hash(v)
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Self::Document(Arc::new(v))
    }
}

impl From<Arc<Document>> for Value {
    fn from(v: Arc<Document>) -> Self {
        Self::Document(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
