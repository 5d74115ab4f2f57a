//! Persistence translation engine.
//!
//! Compiles document snapshots plus ledger changes into insert documents and
//! atomic update documents. Every recursive step returns an owned
//! [`OperationDocument`] that the caller merges under its own path.
mod collection;
mod deferred;
mod embedded;
mod insert;
mod operation;
mod prepare;
mod reference;
mod update;

#[cfg(test)]
mod tests;

use crate::{
    convert::ConverterRegistry,
    error::TranslateError,
    ledger::ChangeLedger,
    model::{ClassMetadata, FieldKind, FieldMapping, MappingError, MetadataSource},
    obs::sink::{self, TranslateEvent},
    value::{Document, Value},
    wire::{WireDocument, WireValue},
};
use docmap_config::PersisterConfig;
use docmap_primitives::ScalarKind;

// re-exports
pub use collection::{CollectionPersister, index_diff};
pub use deferred::DeferredUpdate;
pub use insert::InsertOutcome;
pub use operation::{OperationDocument, OperationError, UpdateOperator};
pub use prepare::Prepared;
pub use reference::{ReferenceError, ReferenceTarget, ShapedReference};

///
/// Persister
///
/// Borrowed view over the collaborators one translation needs. Cheap to
/// copy; holds no state of its own.
///

#[derive(Clone, Copy)]
pub struct Persister<'a> {
    config: &'a PersisterConfig,
    metadata: &'a dyn MetadataSource,
    ledger: &'a dyn ChangeLedger,
    converters: &'a ConverterRegistry,
}

impl<'a> Persister<'a> {
    #[must_use]
    pub const fn new(
        config: &'a PersisterConfig,
        metadata: &'a dyn MetadataSource,
        ledger: &'a dyn ChangeLedger,
        converters: &'a ConverterRegistry,
    ) -> Self {
        Self {
            config,
            metadata,
            ledger,
            converters,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &'a PersisterConfig {
        self.config
    }

    /// Standalone queries for one collection field.
    #[must_use]
    pub const fn collections(&self) -> CollectionPersister<'a> {
        CollectionPersister::new(*self)
    }

    fn class_of(&self, document: &Document) -> Result<&'a ClassMetadata, TranslateError> {
        Ok(self.metadata.require_class(document.class_name())?)
    }

    /// Identifier held by the document's identifier field, else the one the
    /// ledger has assigned.
    fn identifier_of(&self, class: &ClassMetadata, document: &Document) -> Option<Value> {
        class
            .identifier()
            .map(|field| document.field(&field.field_name))
            .filter(|value| !value.is_null())
            .cloned()
            .or_else(|| self.ledger.identifier_of(document))
    }

    // Record the failure against the class and pass the error through.
    fn observe_failure(class: &ClassMetadata, err: TranslateError) -> TranslateError {
        sink::record(TranslateEvent::TranslateFailed {
            class: class.name(),
            error_class: err.class,
        });

        err
    }
}

/// Scalar kind of an identifier field.
fn identifier_kind(class: &ClassMetadata, field: &FieldMapping) -> Result<ScalarKind, MappingError> {
    match field.kind {
        FieldKind::Scalar(kind) => Ok(kind),
        _ => Err(MappingError::IdentifierNotScalar {
            class: class.name().to_string(),
            field: field.field_name.clone(),
        }),
    }
}

/// Write one stored key, refusing to replace a key already written.
fn write_key(
    class: &ClassMetadata,
    out: &mut WireDocument,
    key: impl Into<String>,
    value: WireValue,
) -> Result<(), MappingError> {
    let key = key.into();
    if out.contains_key(&key) {
        return Err(MappingError::ReservedWireName {
            class: class.name().to_string(),
            name: key,
        });
    }
    out.insert(key, value);

    Ok(())
}
