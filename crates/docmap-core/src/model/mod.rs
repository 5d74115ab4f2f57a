//! Mapping model.
//!
//! Immutable per-class and per-field persistence metadata. The model is
//! produced by an external metadata loader and consumed read-only by the
//! persister through [`MetadataSource`].
//!
//! In general:
//! - `field` describes how one field is stored
//! - `class` groups fields and carries collection and discriminator data
//! - `registry` answers class lookups for the persister
pub mod class;
pub mod discriminator;
pub mod error;
pub mod field;
pub mod registry;

// re-exports
pub use class::{ClassDiscriminator, ClassMetadata, ClassMetadataBuilder};
pub use discriminator::DiscriminatorMap;
pub use error::MappingError;
pub use field::{Association, CollectionStrategy, FieldKind, FieldMapping};
pub use registry::{MetadataRegistry, MetadataSource};
