//! Change-ledger contracts.
//!
//! The persister never tracks changes itself. It asks a [`ChangeLedger`] for
//! per-field `(old, new)` pairs, identifiers and collection diffs.

use crate::value::{Document, DocumentHandle, Value};
use derive_more::{Deref, IntoIterator};
use std::collections::BTreeMap;

///
/// ChangeEntry
///
/// Prior and current value of one field. Absent sides are `Null`.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeEntry {
    pub old: Value,
    pub new: Value,
}

impl ChangeEntry {
    pub fn new(old: impl Into<Value>, new: impl Into<Value>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.old == self.new
    }
}

///
/// ChangeSet
///
/// `field_name -> ChangeEntry` for the fields the ledger considers changed.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct ChangeSet(BTreeMap<String, ChangeEntry>);

impl ChangeSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, field_name: impl Into<String>, entry: ChangeEntry) {
        self.0.insert(field_name.into(), entry);
    }
}

impl<K: Into<String>> FromIterator<(K, ChangeEntry)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (K, ChangeEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

///
/// CollectionDiff
///
/// Elements added to and removed from a collection since its last
/// persisted snapshot, in collection order.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectionDiff {
    pub inserted: Vec<Value>,
    pub deleted: Vec<Value>,
}

impl CollectionDiff {
    #[must_use]
    pub const fn new(inserted: Vec<Value>, deleted: Vec<Value>) -> Self {
        Self { inserted, deleted }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty()
    }
}

///
/// ChangeLedger
///

pub trait ChangeLedger {
    /// Changed fields of one document.
    fn change_set(&self, document: &Document) -> ChangeSet;

    /// Persisted identifier, if the document has been assigned one.
    fn identifier_of(&self, document: &Document) -> Option<Value>;

    /// Insert/delete diff of a mapped collection field.
    fn collection_diff(&self, owner: &Document, field_name: &str) -> CollectionDiff;
}

///
/// MemoryLedger
///
/// Map-backed ledger keyed by document handle. Used by callers that compute
/// changes up front, and by tests.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    changes: BTreeMap<DocumentHandle, ChangeSet>,
    identifiers: BTreeMap<DocumentHandle, Value>,
    diffs: BTreeMap<(DocumentHandle, String), CollectionDiff>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_change(
        &mut self,
        document: &Document,
        field_name: impl Into<String>,
        old: impl Into<Value>,
        new: impl Into<Value>,
    ) {
        self.changes
            .entry(document.handle())
            .or_default()
            .insert(field_name, ChangeEntry::new(old, new));
    }

    pub fn assign_identifier(&mut self, document: &Document, id: impl Into<Value>) {
        self.identifiers.insert(document.handle(), id.into());
    }

    pub fn record_collection_diff(
        &mut self,
        owner: &Document,
        field_name: impl Into<String>,
        diff: CollectionDiff,
    ) {
        self.diffs
            .insert((owner.handle(), field_name.into()), diff);
    }

    /// Drop all recorded changes and diffs; identifiers are kept.
    pub fn clear_changes(&mut self) {
        self.changes.clear();
        self.diffs.clear();
    }
}

impl ChangeLedger for MemoryLedger {
    fn change_set(&self, document: &Document) -> ChangeSet {
        self.changes
            .get(&document.handle())
            .cloned()
            .unwrap_or_default()
    }

    fn identifier_of(&self, document: &Document) -> Option<Value> {
        self.identifiers.get(&document.handle()).cloned()
    }

    fn collection_diff(&self, owner: &Document, field_name: &str) -> CollectionDiff {
        self.diffs
            .get(&(owner.handle(), field_name.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

///
/// TESTS
///
