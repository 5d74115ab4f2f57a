//! Core translation engine for docmap: the mapping model, in-memory and wire
//! values, scalar converters, ledger contracts and the persister that
//! compiles document changes into insert and atomic update documents.

pub mod convert;
pub mod error;
pub mod ledger;
pub mod model;
pub mod obs;
pub mod persist;
pub mod value;
pub mod wire;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Domain vocabulary only. Errors, converters and sinks are imported from
/// their modules.
///

pub mod prelude {
    pub use crate::{
        ledger::{ChangeEntry, ChangeLedger, CollectionDiff},
        model::{Association, ClassMetadata, CollectionStrategy, FieldMapping, MetadataSource},
        persist::{OperationDocument, Persister, UpdateOperator},
        value::{Document, Value},
        wire::{WireDocument, WireValue},
    };
}
