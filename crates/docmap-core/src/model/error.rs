use docmap_primitives::ScalarKind;
use thiserror::Error as ThisError;

///
/// MappingError
///
/// Broken mapping configuration. These surface immediately and are never
/// caused by document data.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MappingError {
    #[error("class '{class}' is registered twice")]
    DuplicateClass { class: String },

    #[error("discriminator map lists class '{class}' more than once")]
    DuplicateDiscriminatorClass { class: String },

    #[error("discriminator map lists code '{code}' more than once")]
    DuplicateDiscriminatorCode { code: String },

    #[error("class '{class}' declares more than one identifier field")]
    DuplicateIdentifier { class: String },

    #[error("class '{class}' maps wire name '{name}' more than once")]
    DuplicateWireName { class: String, name: String },

    #[error("discriminator map contains an empty code")]
    EmptyDiscriminatorCode,

    #[error("identifier field '{class}.{field}' must be a scalar")]
    IdentifierNotScalar { class: String, field: String },

    #[error("association from '{class}.{field}' targets {expected} class '{target}'")]
    InvalidAssociationTarget {
        class: String,
        field: String,
        target: String,
        expected: &'static str,
    },

    #[error("identifier field '{class}.{field}' cannot be backed by '{kind}'")]
    InvalidIdentifierKind {
        class: String,
        field: String,
        kind: ScalarKind,
    },

    #[error("class '{class}' maps invalid wire name '{name}'")]
    InvalidWireName { class: String, name: String },

    #[error("class '{class}' has no identifier field")]
    MissingIdentifier { class: String },

    #[error("reference has no target class and the value does not carry one")]
    MissingTargetType,

    #[error("increment field '{class}.{field}' must be numeric, found '{kind}'")]
    NonNumericIncrement {
        class: String,
        field: String,
        kind: ScalarKind,
    },

    #[error("field '{class}.{field}' is not a mapped collection")]
    NotACollection { class: String, field: String },

    #[error("class '{class}' stores a field under reserved key '{name}'")]
    ReservedWireName { class: String, name: String },

    #[error("no metadata registered for class '{class}'")]
    UnknownClass { class: String },

    #[error("class '{class}' has no field '{field}'")]
    UnknownField { class: String, field: String },

    #[error("class '{class}' is not in the discriminator map")]
    UnmappedDiscriminatorClass { class: String },

    #[error("discriminator code '{code}' is not in the discriminator map")]
    UnmappedDiscriminatorCode { code: String },
}
