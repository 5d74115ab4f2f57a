use crate::wire::{WireDocument, WireValue};
use docmap_config::PersisterConfig;
use std::{collections::BTreeMap, fmt};
use thiserror::Error as ThisError;

///
/// UpdateOperator
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum UpdateOperator {
    Inc,
    PullAll,
    PushAll,
    Set,
    Unset,
}

impl UpdateOperator {
    /// Operator name without the configured prefix.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inc => "inc",
            Self::PullAll => "pullAll",
            Self::PushAll => "pushAll",
            Self::Set => "set",
            Self::Unset => "unset",
        }
    }

    // pushAll/pullAll splice the same array and may share a path.
    const fn shares_path_with(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::PullAll, Self::PushAll) | (Self::PushAll, Self::PullAll)
        )
    }
}

impl fmt::Display for UpdateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// OperationError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum OperationError {
    #[error("path '{path}' is already written by '{existing}', cannot add it under '{operator}'")]
    PathConflict {
        path: String,
        operator: UpdateOperator,
        existing: UpdateOperator,
    },
}

///
/// OperationDocument
///
/// `operator -> dotted path -> value`. A path appears under at most one
/// operator, except for the pushAll/pullAll pair. Paths never overwrite.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationDocument {
    ops: BTreeMap<UpdateOperator, BTreeMap<String, WireValue>>,
}

impl OperationDocument {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ops: BTreeMap::new(),
        }
    }

    pub fn insert(
        &mut self,
        operator: UpdateOperator,
        path: impl Into<String>,
        value: WireValue,
    ) -> Result<(), OperationError> {
        let path = path.into();

        for (existing, paths) in &self.ops {
            if paths.contains_key(&path) && !operator.shares_path_with(*existing) {
                return Err(OperationError::PathConflict {
                    path,
                    operator,
                    existing: *existing,
                });
            }
        }
        self.ops.entry(operator).or_default().insert(path, value);

        Ok(())
    }

    /// Merge a sibling document at the same level.
    pub fn merge(&mut self, other: Self) -> Result<(), OperationError> {
        for (operator, paths) in other.ops {
            for (path, value) in paths {
                self.insert(operator, path, value)?;
            }
        }

        Ok(())
    }

    /// Merge a child document, re-rooting each of its paths under `prefix.`.
    pub fn merge_under(&mut self, prefix: &str, other: Self) -> Result<(), OperationError> {
        for (operator, paths) in other.ops {
            for (path, value) in paths {
                self.insert(operator, format!("{prefix}.{path}"), value)?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn get(&self, operator: UpdateOperator, path: &str) -> Option<&WireValue> {
        self.ops.get(&operator)?.get(path)
    }

    /// Paths written under one operator, in path order.
    pub fn paths(&self, operator: UpdateOperator) -> impl Iterator<Item = (&str, &WireValue)> {
        self.ops
            .get(&operator)
            .into_iter()
            .flatten()
            .map(|(path, value)| (path.as_str(), value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.values().all(BTreeMap::is_empty)
    }

    /// Total number of `(operator, path)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.values().map(BTreeMap::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UpdateOperator, &str, &WireValue)> {
        self.ops.iter().flat_map(|(operator, paths)| {
            paths
                .iter()
                .map(move |(path, value)| (*operator, path.as_str(), value))
        })
    }

    /// Split into documents a store can apply one after another.
    ///
    /// Paths spliced by both pushAll and pullAll are moved into a second
    /// document so the pull runs first. Otherwise the document is returned
    /// as-is. Empty documents produce no batch.
    #[must_use]
    pub fn into_batches(mut self) -> Vec<Self> {
        let shared: Vec<String> = match (
            self.ops.get(&UpdateOperator::PullAll),
            self.ops.get(&UpdateOperator::PushAll),
        ) {
            (Some(pulls), Some(pushes)) => pulls
                .keys()
                .filter(|path| pushes.contains_key(*path))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };

        if shared.is_empty() {
            return if self.is_empty() { Vec::new() } else { vec![self] };
        }

        let mut second = Self::new();
        if let Some(pushes) = self.ops.get_mut(&UpdateOperator::PushAll) {
            for path in shared {
                if let Some(value) = pushes.remove(&path) {
                    second
                        .ops
                        .entry(UpdateOperator::PushAll)
                        .or_default()
                        .insert(path, value);
                }
            }
        }
        self.ops.retain(|_, paths| !paths.is_empty());

        vec![self, second]
    }

    /// Render with prefixed operator keys: `{"$set": {...}, "$inc": {...}}`.
    #[must_use]
    pub fn to_wire(&self, config: &PersisterConfig) -> WireDocument {
        self.ops
            .iter()
            .filter(|(_, paths)| !paths.is_empty())
            .map(|(operator, paths)| {
                let body: WireDocument = paths
                    .iter()
                    .map(|(path, value)| (path.clone(), value.clone()))
                    .collect();

                (config.prefixed(operator.name()), WireValue::Document(body))
            })
            .collect()
    }

    #[must_use]
    pub fn to_json(&self, config: &PersisterConfig) -> serde_json::Value {
        self.to_wire(config).to_json()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn int(v: i64) -> WireValue {
        WireValue::Int(v)
    }

    #[test]
    fn same_path_under_two_operators_conflicts() {
        let mut doc = OperationDocument::new();
        doc.insert(UpdateOperator::Set, "name", int(1)).unwrap();

        let err = doc
            .insert(UpdateOperator::Unset, "name", WireValue::Bool(true))
            .unwrap_err();
        assert_eq!(
            err,
            OperationError::PathConflict {
                path: "name".to_string(),
                operator: UpdateOperator::Unset,
                existing: UpdateOperator::Set,
            }
        );
        assert!(doc.insert(UpdateOperator::Set, "name", int(2)).is_err());
    }

    #[test]
    fn push_and_pull_may_share_a_path() {
        let mut doc = OperationDocument::new();
        doc.insert(UpdateOperator::PullAll, "tags", WireValue::Array(vec![int(1)]))
            .unwrap();
        doc.insert(UpdateOperator::PushAll, "tags", WireValue::Array(vec![int(2)]))
            .unwrap();

        assert_eq!(doc.len(), 2);
        assert!(doc.insert(UpdateOperator::Set, "tags", int(0)).is_err());
    }

    #[test]
    fn merge_under_prefixes_child_paths() {
        let mut child = OperationDocument::new();
        child.insert(UpdateOperator::Set, "leaf", int(1)).unwrap();
        child.insert(UpdateOperator::Inc, "count", int(2)).unwrap();

        let mut parent = OperationDocument::new();
        parent.insert(UpdateOperator::Set, "outer", int(0)).unwrap();
        parent.merge_under("inner", child).unwrap();

        assert_eq!(parent.get(UpdateOperator::Set, "inner.leaf"), Some(&int(1)));
        assert_eq!(parent.get(UpdateOperator::Inc, "inner.count"), Some(&int(2)));
        assert_eq!(parent.get(UpdateOperator::Set, "outer"), Some(&int(0)));
    }

    #[test]
    fn batches_run_pull_before_push() {
        let mut doc = OperationDocument::new();
        doc.insert(UpdateOperator::Set, "name", int(1)).unwrap();
        doc.insert(UpdateOperator::PullAll, "tags", WireValue::Array(vec![int(1)]))
            .unwrap();
        doc.insert(UpdateOperator::PushAll, "tags", WireValue::Array(vec![int(2)]))
            .unwrap();

        let batches = doc.into_batches();
        assert_eq!(batches.len(), 2);
        assert!(batches[0].get(UpdateOperator::PullAll, "tags").is_some());
        assert!(batches[0].get(UpdateOperator::PushAll, "tags").is_none());
        assert!(batches[0].get(UpdateOperator::Set, "name").is_some());
        assert_eq!(batches[1].len(), 1);
        assert!(batches[1].get(UpdateOperator::PushAll, "tags").is_some());
    }

    #[test]
    fn empty_document_yields_no_batches() {
        assert!(OperationDocument::new().into_batches().is_empty());
    }

    #[test]
    fn wire_form_uses_prefixed_operator_names() {
        let mut doc = OperationDocument::new();
        doc.insert(UpdateOperator::Inc, "score", int(3)).unwrap();
        doc.insert(UpdateOperator::Unset, "email", WireValue::Bool(true))
            .unwrap();

        let config = PersisterConfig::default();
        assert_eq!(
            doc.to_json(&config),
            json!({ "$inc": { "score": 3 }, "$unset": { "email": true } })
        );
    }
}
