//! Collection diffs and standalone collection queries.

use crate::{
    error::TranslateError,
    ledger::CollectionDiff,
    model::{Association, FieldKind, FieldMapping, MappingError},
    persist::{OperationDocument, Persister, UpdateOperator, prepare::ElementKind},
    value::{Document, Value},
    wire::WireValue,
};

/// Per-index diff of a plain array.
///
/// An entry is deleted when its index is missing from `new` or holds a
/// different value there, and inserted symmetrically. Reordering therefore
/// shows up as a full replacement.
#[must_use]
pub fn index_diff(old: &[Value], new: &[Value]) -> CollectionDiff {
    let changed_from = |side: &[Value], other: &[Value]| -> Vec<Value> {
        side.iter()
            .enumerate()
            .filter(|(idx, value)| other.get(*idx) != Some(*value))
            .map(|(_, value)| value.clone())
            .collect()
    };

    CollectionDiff::new(changed_from(new, old), changed_from(old, new))
}

///
/// CollectionPersister
///
/// Issues queries that touch a single mapped collection of a stored
/// document, outside of a full document update. Collections owned by
/// embedded documents are written through their owner and produce no query.
///

#[derive(Clone, Copy)]
pub struct CollectionPersister<'a> {
    persister: Persister<'a>,
}

impl<'a> CollectionPersister<'a> {
    pub(crate) const fn new(persister: Persister<'a>) -> Self {
        Self { persister }
    }

    /// Remove the whole collection: `unset[path] = 1`.
    pub fn delete_query(
        &self,
        owner: &Document,
        field_name: &str,
    ) -> Result<Option<OperationDocument>, TranslateError> {
        let Some((field, _, _)) = self.collection_field(owner, field_name)? else {
            return Ok(None);
        };

        let mut ops = OperationDocument::new();
        ops.insert(UpdateOperator::Unset, field.name.as_str(), WireValue::Int(1))?;

        Ok(Some(ops))
    }

    /// Append the ledger's inserted elements with `pushAll`.
    pub fn insert_documents_query(
        &self,
        owner: &Document,
        field_name: &str,
    ) -> Result<Option<OperationDocument>, TranslateError> {
        self.splice_query(owner, field_name, UpdateOperator::PushAll)
    }

    /// Remove the ledger's deleted elements with `pullAll`.
    pub fn delete_documents_query(
        &self,
        owner: &Document,
        field_name: &str,
    ) -> Result<Option<OperationDocument>, TranslateError> {
        self.splice_query(owner, field_name, UpdateOperator::PullAll)
    }

    /// Delete then insert, as separate queries applied in order.
    pub fn update_queries(
        &self,
        owner: &Document,
        field_name: &str,
    ) -> Result<Vec<OperationDocument>, TranslateError> {
        Ok([
            self.delete_documents_query(owner, field_name)?,
            self.insert_documents_query(owner, field_name)?,
        ]
        .into_iter()
        .flatten()
        .collect())
    }

    fn splice_query(
        &self,
        owner: &Document,
        field_name: &str,
        operator: UpdateOperator,
    ) -> Result<Option<OperationDocument>, TranslateError> {
        let Some((field, kind, association)) = self.collection_field(owner, field_name)? else {
            return Ok(None);
        };

        let diff = self.persister.ledger.collection_diff(owner, field_name);
        let elements = match operator {
            UpdateOperator::PullAll => &diff.deleted,
            _ => &diff.inserted,
        };
        if elements.is_empty() {
            return Ok(None);
        }

        let wire = self
            .persister
            .element_array(kind, association, elements)
            .map_err(|err| err.with_field(&field.name))?;
        let mut ops = OperationDocument::new();
        ops.insert(operator, field.name.as_str(), wire)?;

        Ok(Some(ops))
    }

    // Resolve a mapped collection field; `None` for embedded owners.
    fn collection_field(
        &self,
        owner: &Document,
        field_name: &str,
    ) -> Result<Option<(&'a FieldMapping, ElementKind, &'a Association)>, TranslateError> {
        let class = self.persister.class_of(owner)?;
        if class.is_embedded() {
            return Ok(None);
        }

        let field = class
            .field(field_name)
            .ok_or_else(|| MappingError::UnknownField {
                class: class.name().to_string(),
                field: field_name.to_string(),
            })?;

        match &field.kind {
            FieldKind::EmbedMany { association, .. } => {
                Ok(Some((field, ElementKind::Embedded, association)))
            }
            FieldKind::ReferenceMany { association, .. } => {
                Ok(Some((field, ElementKind::Reference, association)))
            }
            _ => Err(MappingError::NotACollection {
                class: class.name().to_string(),
                field: field_name.to_string(),
            }
            .into()),
        }
    }
}
