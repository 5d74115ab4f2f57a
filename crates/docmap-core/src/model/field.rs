use crate::model::{DiscriminatorMap, MappingError};
use docmap_primitives::ScalarKind;
use std::sync::Arc;

///
/// CollectionStrategy
///
/// Update policy for array-valued fields.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CollectionStrategy {
    /// Splice with paired `pushAll` / `pullAll` operators.
    #[default]
    PushPull,
    /// Replace the whole field with `set`.
    Set,
}

///
/// Association
///
/// Target description shared by embedded and reference fields.
/// A pinned `target` fixes the concrete class; without one the stored value
/// carries a discriminator.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Association {
    pub target: Option<String>,
    pub discriminator_field: Option<String>,
    pub discriminator_map: Option<Arc<DiscriminatorMap>>,
}

impl Association {
    #[must_use]
    pub fn pinned(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn polymorphic() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_discriminator_field(mut self, field: impl Into<String>) -> Self {
        self.discriminator_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_discriminator_map(mut self, map: DiscriminatorMap) -> Self {
        self.discriminator_map = Some(Arc::new(map));
        self
    }

    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.target.is_some()
    }

    /// Discriminator field name, falling back to `default`.
    #[must_use]
    pub fn discriminator_field_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.discriminator_field.as_deref().unwrap_or(default)
    }

    /// Code stored for a concrete class.
    ///
    /// With a declared map the class must be mapped; without one the class
    /// name is stored verbatim.
    pub fn discriminator_value<'a>(&'a self, class: &'a str) -> Result<&'a str, MappingError> {
        match &self.discriminator_map {
            Some(map) => {
                map.code_for(class)
                    .ok_or_else(|| MappingError::UnmappedDiscriminatorClass {
                        class: class.to_string(),
                    })
            }
            None => Ok(class),
        }
    }

    /// Concrete class for a stored code; unmapped codes are taken verbatim.
    #[must_use]
    pub fn class_for_discriminator<'a>(&'a self, code: &'a str) -> &'a str {
        self.discriminator_map
            .as_ref()
            .and_then(|map| map.class_for(code))
            .unwrap_or(code)
    }
}

///
/// FieldKind
///
/// Closed set of persistence kinds. Embedded and reference kinds carry their
/// association; plain kinds carry none.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    EmbedMany {
        association: Association,
        strategy: CollectionStrategy,
    },
    EmbedOne(Association),
    Increment(ScalarKind),
    PlainCollection {
        strategy: CollectionStrategy,
    },
    ReferenceMany {
        association: Association,
        strategy: CollectionStrategy,
    },
    ReferenceOne(Association),
    Scalar(ScalarKind),
}

impl FieldKind {
    #[must_use]
    pub const fn association(&self) -> Option<&Association> {
        match self {
            Self::EmbedMany { association, .. }
            | Self::ReferenceMany { association, .. }
            | Self::EmbedOne(association)
            | Self::ReferenceOne(association) => Some(association),
            Self::Increment(_) | Self::PlainCollection { .. } | Self::Scalar(_) => None,
        }
    }

    #[must_use]
    pub const fn strategy(&self) -> Option<CollectionStrategy> {
        match self {
            Self::EmbedMany { strategy, .. }
            | Self::PlainCollection { strategy }
            | Self::ReferenceMany { strategy, .. } => Some(*strategy),
            Self::EmbedOne(_) | Self::Increment(_) | Self::ReferenceOne(_) | Self::Scalar(_) => {
                None
            }
        }
    }

    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        matches!(self, Self::EmbedMany { .. } | Self::EmbedOne(_))
    }

    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::ReferenceMany { .. } | Self::ReferenceOne(_))
    }

    /// Mapped collections hold embedded documents or references.
    #[must_use]
    pub const fn is_mapped_collection(&self) -> bool {
        matches!(self, Self::EmbedMany { .. } | Self::ReferenceMany { .. })
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EmbedMany { .. } => "embedMany",
            Self::EmbedOne(_) => "embedOne",
            Self::Increment(_) => "increment",
            Self::PlainCollection { .. } => "collection",
            Self::ReferenceMany { .. } => "referenceMany",
            Self::ReferenceOne(_) => "referenceOne",
            Self::Scalar(_) => "scalar",
        }
    }
}

///
/// FieldMapping
///
/// How one field of a class is persisted.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMapping {
    /// Field name on the in-memory document; the change-set key.
    pub field_name: String,
    /// Wire name in the stored document.
    pub name: String,
    pub nullable: bool,
    pub is_identifier: bool,
    /// Excluded from every write.
    pub not_saved: bool,
    pub kind: FieldKind,
}

impl FieldMapping {
    fn with_kind(field_name: impl Into<String>, kind: FieldKind) -> Self {
        let field_name = field_name.into();

        Self {
            name: field_name.clone(),
            field_name,
            nullable: false,
            is_identifier: false,
            not_saved: false,
            kind,
        }
    }

    #[must_use]
    pub fn scalar(field_name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::with_kind(field_name, FieldKind::Scalar(kind))
    }

    #[must_use]
    pub fn identifier(field_name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            is_identifier: true,
            ..Self::scalar(field_name, kind)
        }
    }

    #[must_use]
    pub fn increment(field_name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::with_kind(field_name, FieldKind::Increment(kind))
    }

    #[must_use]
    pub fn embed_one(field_name: impl Into<String>, association: Association) -> Self {
        Self::with_kind(field_name, FieldKind::EmbedOne(association))
    }

    #[must_use]
    pub fn embed_many(field_name: impl Into<String>, association: Association) -> Self {
        Self::with_kind(
            field_name,
            FieldKind::EmbedMany {
                association,
                strategy: CollectionStrategy::default(),
            },
        )
    }

    #[must_use]
    pub fn reference_one(field_name: impl Into<String>, association: Association) -> Self {
        Self::with_kind(field_name, FieldKind::ReferenceOne(association))
    }

    #[must_use]
    pub fn reference_many(field_name: impl Into<String>, association: Association) -> Self {
        Self::with_kind(
            field_name,
            FieldKind::ReferenceMany {
                association,
                strategy: CollectionStrategy::default(),
            },
        )
    }

    #[must_use]
    pub fn collection(field_name: impl Into<String>) -> Self {
        Self::with_kind(
            field_name,
            FieldKind::PlainCollection {
                strategy: CollectionStrategy::default(),
            },
        )
    }

    /// Set the collection strategy; ignored for non-collection kinds.
    #[must_use]
    pub fn with_strategy(mut self, strategy: CollectionStrategy) -> Self {
        match &mut self.kind {
            FieldKind::EmbedMany { strategy: slot, .. }
            | FieldKind::PlainCollection { strategy: slot }
            | FieldKind::ReferenceMany { strategy: slot, .. } => *slot = strategy,
            FieldKind::EmbedOne(_)
            | FieldKind::Increment(_)
            | FieldKind::ReferenceOne(_)
            | FieldKind::Scalar(_) => {}
        }

        self
    }

    #[must_use]
    pub fn allow_null(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn stored_as(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn transient(mut self) -> Self {
        self.not_saved = true;
        self
    }

    #[must_use]
    pub const fn association(&self) -> Option<&Association> {
        self.kind.association()
    }

    #[must_use]
    pub const fn strategy(&self) -> Option<CollectionStrategy> {
        self.kind.strategy()
    }
}
