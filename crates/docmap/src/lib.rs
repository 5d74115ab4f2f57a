//! ## Crate layout
//! - `config`: persister naming conventions loaded from TOML.
//! - `core`: mapping model, values, converters, ledger contracts and the
//!   persister that compiles inserts and atomic updates.
//! - `primitives`: scalar kind registry shared by the model and converters.
//!
//! The `prelude` module carries the types needed to describe a mapping and
//! translate documents with it.

pub use docmap_config as config;
pub use docmap_core as core;
pub use docmap_primitives as primitives;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Errors
//

pub use docmap_config::ConfigError;
pub use docmap_core::error::TranslateError as Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        config::PersisterConfig,
        core::{
            convert::ConverterRegistry, ledger::MemoryLedger, model::MetadataRegistry, prelude::*,
        },
        primitives::ScalarKind,
    };
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use serde_json::json;

    #[test]
    fn prelude_covers_a_full_translation() {
        let registry = MetadataRegistry::from_classes([ClassMetadata::document("app::Note")
            .fields([
                FieldMapping::identifier("id", ScalarKind::Int),
                FieldMapping::scalar("body", ScalarKind::Text),
            ])
            .build()
            .unwrap()])
        .unwrap();
        let config = PersisterConfig::default();
        let converters = ConverterRegistry::new();
        let ledger = MemoryLedger::new();
        let note = Document::new("app::Note").with("id", 7).with("body", "hi");

        let outcome = Persister::new(&config, &registry, &ledger, &converters)
            .compile_insert(&note)
            .unwrap();

        assert_eq!(outcome.document.to_json(), json!({ "_id": 7, "body": "hi" }));
        assert!(!super::VERSION.is_empty());
    }
}
