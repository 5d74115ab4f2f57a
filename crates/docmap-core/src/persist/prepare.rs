use crate::{
    convert::ConvertError,
    error::TranslateError,
    model::{Association, FieldKind, FieldMapping},
    persist::{Persister, ShapedReference},
    value::Value,
    wire::WireValue,
};
use docmap_primitives::ScalarKind;

///
/// Prepared
///
/// Result of preparing one field value for the wire. `Deferred` means a
/// reference somewhere inside the value has no identifier yet.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Prepared {
    Deferred { class: String },
    Value(WireValue),
}

impl Prepared {
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred { .. })
    }
}

///
/// ElementKind
///
/// How the elements of a mapped collection are prepared.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ElementKind {
    Embedded,
    Reference,
}

impl<'a> Persister<'a> {
    /// Prepare the current value of a non-identifier field.
    ///
    /// Scalars go through the converter registry; embedded values are
    /// materialized and references shaped. Mapped collections with no
    /// elements prepare to `Null`, plain collections to an empty array.
    pub(crate) fn prepare_value(
        &self,
        field: &FieldMapping,
        value: &Value,
    ) -> Result<Prepared, TranslateError> {
        if value.is_null() {
            return Ok(Prepared::Value(WireValue::Null));
        }

        match &field.kind {
            FieldKind::Increment(kind) | FieldKind::Scalar(kind) => {
                Ok(Prepared::Value(self.converters.to_wire(*kind, value)?))
            }
            FieldKind::PlainCollection { .. } => Ok(Prepared::Value(
                self.converters.to_wire(ScalarKind::Collection, value)?,
            )),
            FieldKind::EmbedOne(association) => {
                self.prepare_element(ElementKind::Embedded, association, value)
            }
            FieldKind::ReferenceOne(association) => {
                self.prepare_element(ElementKind::Reference, association, value)
            }
            FieldKind::EmbedMany { association, .. } => {
                self.prepare_many(ElementKind::Embedded, association, value)
            }
            FieldKind::ReferenceMany { association, .. } => {
                self.prepare_many(ElementKind::Reference, association, value)
            }
        }
    }

    /// Prepare one element of a mapped field.
    pub(crate) fn prepare_element(
        &self,
        kind: ElementKind,
        association: &Association,
        value: &Value,
    ) -> Result<Prepared, TranslateError> {
        match (kind, value) {
            (_, Value::Null) => Ok(Prepared::Value(WireValue::Null)),
            (ElementKind::Embedded, Value::Document(doc)) => {
                self.materialize_embedded(association, doc)
            }
            (ElementKind::Embedded, other) => Err(ConvertError::ExpectedDocument {
                found: other.kind_name(),
            }
            .into()),
            (ElementKind::Reference, _) => Ok(match self.shape_reference(association, value)? {
                ShapedReference::Deferred { class } => Prepared::Deferred { class },
                ShapedReference::Resolved(reference) => {
                    Prepared::Value(WireValue::Document(reference))
                }
            }),
        }
    }

    /// Prepare every element of a mapped collection. One deferred element
    /// defers the whole collection.
    pub(crate) fn prepare_many(
        &self,
        kind: ElementKind,
        association: &Association,
        value: &Value,
    ) -> Result<Prepared, TranslateError> {
        let items = list_items(value)?;
        if items.is_empty() {
            return Ok(Prepared::Value(WireValue::Null));
        }

        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match self
                .prepare_element(kind, association, item)
                .map_err(|err| err.with_index(idx))?
            {
                Prepared::Deferred { class } => return Ok(Prepared::Deferred { class }),
                Prepared::Value(wire) => out.push(wire),
            }
        }

        Ok(Prepared::Value(WireValue::Array(out)))
    }
}

/// Elements of a collection value; `Null` reads as empty.
pub(crate) fn list_items(value: &Value) -> Result<&[Value], ConvertError> {
    match value {
        Value::Null => Ok(&[]),
        Value::List(items) => Ok(items),
        other => Err(ConvertError::ExpectedList {
            found: other.kind_name(),
        }),
    }
}
