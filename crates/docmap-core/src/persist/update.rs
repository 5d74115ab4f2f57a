use crate::{
    convert::{ConvertError, plain_to_wire},
    error::TranslateError,
    ledger::ChangeEntry,
    model::{Association, ClassMetadata, CollectionStrategy, FieldKind, FieldMapping},
    obs::sink::{self, TranslateEvent},
    persist::{
        OperationDocument, Persister, Prepared, ReferenceError, UpdateOperator,
        collection::index_diff,
        prepare::{ElementKind, list_items},
    },
    value::{Document, Value},
    wire::WireValue,
};
use docmap_primitives::ScalarKind;

impl Persister<'_> {
    /// Compile the minimal atomic update for a snapshot.
    ///
    /// Only fields with a ledger change entry are considered. Embedded
    /// documents are compiled recursively and merged under dotted paths.
    pub fn compile_update(&self, document: &Document) -> Result<OperationDocument, TranslateError> {
        let class = self.class_of(document)?;
        let ops = self
            .update_fields(class, document)
            .map_err(|err| Self::observe_failure(class, err))?;

        sink::record(TranslateEvent::UpdateCompiled {
            class: class.name(),
            paths: ops.len() as u64,
        });

        Ok(ops)
    }

    fn update_fields(
        &self,
        class: &ClassMetadata,
        document: &Document,
    ) -> Result<OperationDocument, TranslateError> {
        let changes = self.ledger.change_set(document);
        let mut ops = OperationDocument::new();

        for field in class.fields() {
            if field.not_saved || field.is_identifier {
                continue;
            }
            let Some(change) = changes.get(&field.field_name) else {
                continue;
            };

            let field_ops = self
                .update_field(document, field, change)
                .map_err(|err| err.with_field(&field.name))?;
            ops.merge(field_ops)?;
        }

        Ok(ops)
    }

    fn update_field(
        &self,
        owner: &Document,
        field: &FieldMapping,
        change: &ChangeEntry,
    ) -> Result<OperationDocument, TranslateError> {
        let path = field.name.as_str();
        let changed = change.old != change.new;
        let mut ops = OperationDocument::new();

        match &field.kind {
            FieldKind::Increment(kind) => {
                if changed {
                    let delta = self.increment_delta(*kind, change)?;
                    ops.insert(UpdateOperator::Inc, path, delta)?;
                }
            }

            FieldKind::EmbedOne(association) => {
                ops = self.update_embed_one(field, association, change)?;
            }

            FieldKind::EmbedMany {
                association,
                strategy,
            } => {
                ops = self.update_many(
                    owner,
                    field,
                    ElementKind::Embedded,
                    association,
                    *strategy,
                    change,
                )?;
            }

            FieldKind::ReferenceMany {
                association,
                strategy,
            } => {
                ops = self.update_many(
                    owner,
                    field,
                    ElementKind::Reference,
                    association,
                    *strategy,
                    change,
                )?;
            }

            FieldKind::PlainCollection { strategy } => match strategy {
                CollectionStrategy::PushPull => {
                    let diff = index_diff(list_items(&change.old)?, list_items(&change.new)?);
                    if !diff.inserted.is_empty() {
                        ops.insert(UpdateOperator::PushAll, path, plain_array(&diff.inserted)?)?;
                    }
                    if !diff.deleted.is_empty() {
                        ops.insert(UpdateOperator::PullAll, path, plain_array(&diff.deleted)?)?;
                    }
                }
                CollectionStrategy::Set => {
                    if changed {
                        let items = list_items(&change.new)?;
                        ops.insert(UpdateOperator::Set, path, plain_array(items)?)?;
                    }
                }
            },

            FieldKind::ReferenceOne(association) => {
                if changed {
                    if change.new.is_null() {
                        null_or_unset(&mut ops, field)?;
                    } else {
                        let reference = resolved(self.prepare_element(
                            ElementKind::Reference,
                            association,
                            &change.new,
                        )?)?;
                        ops.insert(UpdateOperator::Set, path, reference)?;
                    }
                }
            }

            FieldKind::Scalar(kind) => {
                if changed {
                    let wire = self.converters.to_wire(*kind, &change.new)?;
                    if wire.is_null() {
                        null_or_unset(&mut ops, field)?;
                    } else {
                        ops.insert(UpdateOperator::Set, path, wire)?;
                    }
                }
            }
        }

        Ok(ops)
    }

    // Presence of old and new decides between set, recursion and no-op.
    fn update_embed_one(
        &self,
        field: &FieldMapping,
        association: &Association,
        change: &ChangeEntry,
    ) -> Result<OperationDocument, TranslateError> {
        let path = field.name.as_str();
        let mut ops = OperationDocument::new();

        match (change.old.is_null(), &change.new) {
            (true, Value::Null) => {}

            (true, new) => {
                let wire = resolved(self.prepare_element(
                    ElementKind::Embedded,
                    association,
                    new,
                )?)?;
                if !wire.is_null() || field.nullable {
                    ops.insert(UpdateOperator::Set, path, wire)?;
                }
            }

            (false, Value::Null) => {
                if field.nullable {
                    ops.insert(UpdateOperator::Set, path, WireValue::Null)?;
                }
            }

            (false, Value::Document(doc)) => {
                let class = self.class_of(doc)?;
                let nested = self.update_fields(class, doc)?;
                ops.merge_under(path, nested)?;
            }

            (false, other) => {
                return Err(ConvertError::ExpectedDocument {
                    found: other.kind_name(),
                }
                .into());
            }
        }

        Ok(ops)
    }

    fn update_many(
        &self,
        owner: &Document,
        field: &FieldMapping,
        kind: ElementKind,
        association: &Association,
        strategy: CollectionStrategy,
        change: &ChangeEntry,
    ) -> Result<OperationDocument, TranslateError> {
        let path = field.name.as_str();
        let mut ops = OperationDocument::new();

        if strategy == CollectionStrategy::Set {
            if change.old != change.new {
                let wire = resolved(self.prepare_many(kind, association, &change.new)?)?;
                ops.insert(UpdateOperator::Set, path, wire)?;
            }
            return Ok(ops);
        }

        // A collection never stored before has no array to splice into.
        if change.old.is_null() {
            if !list_items(&change.new)?.is_empty() {
                let wire = resolved(self.prepare_many(kind, association, &change.new)?)?;
                ops.insert(UpdateOperator::Set, path, wire)?;
            }
            return Ok(ops);
        }

        // Elements present on both sides were mutated in place.
        if kind == ElementKind::Embedded {
            let old = list_items(&change.old)?;
            for (idx, element) in list_items(&change.new)?.iter().enumerate() {
                let Value::Document(doc) = element else {
                    continue;
                };
                if old.get(idx).is_none_or(Value::is_null) {
                    continue;
                }
                let class = self.class_of(doc)?;
                let nested = self
                    .update_fields(class, doc)
                    .map_err(|err| err.with_index(idx))?;
                ops.merge_under(&format!("{path}.{idx}"), nested)?;
            }
        }

        let diff = self.ledger.collection_diff(owner, &field.field_name);
        if !diff.inserted.is_empty() {
            let wire = self.element_array(kind, association, &diff.inserted)?;
            ops.insert(UpdateOperator::PushAll, path, wire)?;
        }
        if !diff.deleted.is_empty() {
            let wire = self.element_array(kind, association, &diff.deleted)?;
            ops.insert(UpdateOperator::PullAll, path, wire)?;
        }

        Ok(ops)
    }

    /// Convert each element individually so pulled values match what was
    /// stored when they were pushed.
    pub(crate) fn element_array(
        &self,
        kind: ElementKind,
        association: &Association,
        elements: &[Value],
    ) -> Result<WireValue, TranslateError> {
        let mut out = Vec::with_capacity(elements.len());
        for (idx, element) in elements.iter().enumerate() {
            let prepared = self
                .prepare_element(kind, association, element)
                .and_then(resolved)
                .map_err(|err| err.with_index(idx))?;
            out.push(prepared);
        }

        Ok(WireValue::Array(out))
    }

    // `new - old`, sign preserved; `Null` counts as zero.
    fn increment_delta(
        &self,
        kind: ScalarKind,
        change: &ChangeEntry,
    ) -> Result<WireValue, TranslateError> {
        let old = self.converters.to_wire(kind, &change.old)?;
        let new = self.converters.to_wire(kind, &change.new)?;

        let delta = match (old, new) {
            (WireValue::Int(old), WireValue::Int(new)) => WireValue::Int(
                new.checked_sub(old)
                    .ok_or(ConvertError::OutOfRange { kind })?,
            ),
            (WireValue::Null, WireValue::Int(new)) => WireValue::Int(new),
            (WireValue::Int(old), WireValue::Null) => WireValue::Int(
                old.checked_neg()
                    .ok_or(ConvertError::OutOfRange { kind })?,
            ),
            (old, new) => {
                let old = numeric(kind, &old)?;
                let new = numeric(kind, &new)?;
                WireValue::Float(new - old)
            }
        };

        Ok(delta)
    }
}

/// A deferred reference at update time is an error: the unit-of-work
/// flushes inserts before updates.
fn resolved(prepared: Prepared) -> Result<WireValue, TranslateError> {
    match prepared {
        Prepared::Value(wire) => Ok(wire),
        Prepared::Deferred { class } => Err(ReferenceError::NotPersisted { class }.into()),
    }
}

fn null_or_unset(ops: &mut OperationDocument, field: &FieldMapping) -> Result<(), TranslateError> {
    if field.nullable {
        ops.insert(UpdateOperator::Set, field.name.as_str(), WireValue::Null)?;
    } else {
        ops.insert(UpdateOperator::Unset, field.name.as_str(), WireValue::Bool(true))?;
    }

    Ok(())
}

fn plain_array(items: &[Value]) -> Result<WireValue, TranslateError> {
    Ok(WireValue::Array(
        items.iter().map(plain_to_wire).collect::<Result<_, _>>()?,
    ))
}

#[expect(clippy::cast_precision_loss)]
fn numeric(kind: ScalarKind, wire: &WireValue) -> Result<f64, ConvertError> {
    match wire {
        WireValue::Null => Ok(0.0),
        WireValue::Int(v) => Ok(*v as f64),
        WireValue::Float(v) => Ok(*v),
        other => Err(ConvertError::TypeMismatch {
            kind,
            found: other.kind_name(),
        }),
    }
}
