//! Wire values: the document-store representation produced by the persister.
pub mod render;

use ulid::Ulid;

///
/// WireValue
///

#[derive(Clone, Debug, PartialEq)]
pub enum WireValue {
    Array(Vec<Self>),
    Binary(Vec<u8>),
    Bool(bool),
    /// Milliseconds since the unix epoch.
    Date(i64),
    Document(WireDocument),
    Float(f64),
    Int(i64),
    Null,
    ObjectId(Ulid),
    Text(String),
    /// Seconds since the unix epoch.
    Timestamp(i64),
}

impl WireValue {
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::Binary(_) => "binary",
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::Document(_) => "document",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Null => "null",
            Self::ObjectId(_) => "objectId",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_document(&self) -> Option<&WireDocument> {
        match self {
            Self::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<WireDocument> for WireValue {
    fn from(doc: WireDocument) -> Self {
        Self::Document(doc)
    }
}

///
/// WireDocument
///
/// Insertion-ordered key/value document. Key order is significant on the
/// wire, so equality is order-sensitive.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WireDocument {
    entries: Vec<(String, WireValue)>,
}

impl WireDocument {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a value; an existing key is replaced in place and its old
    /// value returned.
    pub fn insert(&mut self, key: impl Into<String>, value: WireValue) -> Option<WireValue> {
        let key = key.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));

        None
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: WireValue) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<WireValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;

        Some(self.entries.remove(idx).1)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, WireValue)> for WireDocument {
    fn from_iter<I: IntoIterator<Item = (K, WireValue)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (key, value) in iter {
            doc.insert(key, value);
        }

        doc
    }
}
