use crate::{
    error::TranslateError,
    model::{Association, ClassMetadata, MappingError},
    persist::{Persister, identifier_kind},
    value::Value,
    wire::{WireDocument, WireValue},
};
use thiserror::Error as ThisError;

///
/// ReferenceError
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ReferenceError {
    #[error("value of kind '{found}' cannot be used as a reference")]
    InvalidReferenceValue { found: &'static str },

    #[error("stored reference has no discriminator field '{field}'")]
    MissingDiscriminator { field: String },

    #[error("stored reference has no '{key}' entry")]
    MissingKey { key: String },

    #[error("referenced '{class}' document has no identifier yet")]
    NotPersisted { class: String },
}

///
/// ShapedReference
///

#[derive(Clone, Debug, PartialEq)]
pub enum ShapedReference {
    /// Target has no identifier yet (forward reference).
    Deferred { class: String },
    Resolved(WireDocument),
}

///
/// ReferenceTarget
///
/// Class and identifier recovered from a stored reference.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceTarget {
    pub class_name: String,
    pub id: Value,
}

impl<'a> Persister<'a> {
    /// Shape a reference value into its stored form.
    ///
    /// Accepts a document, a raw identifier (`Id`, `Text`, `Int`) or a
    /// pre-shaped hash carrying the prefixed `id` key. Raw identifiers and
    /// hashes need a pinned target class.
    pub fn shape_reference(
        &self,
        association: &Association,
        value: &Value,
    ) -> Result<ShapedReference, TranslateError> {
        let (class, id) = match value {
            Value::Document(doc) => {
                let class = self.class_of(doc)?;
                (class, self.identifier_of(class, doc))
            }
            Value::Id(_) | Value::Int(_) | Value::Text(_) => {
                (self.target_class(association)?, Some(value.clone()))
            }
            Value::Hash(map) => {
                let id = map
                    .get(&self.config.prefixed("id"))
                    .filter(|id| !id.is_null())
                    .cloned();
                (self.target_class(association)?, id)
            }
            other => {
                return Err(ReferenceError::InvalidReferenceValue {
                    found: other.kind_name(),
                }
                .into());
            }
        };

        let Some(id) = id else {
            return Ok(ShapedReference::Deferred {
                class: class.name().to_string(),
            });
        };

        let id_field = class
            .identifier()
            .ok_or_else(|| MappingError::MissingIdentifier {
                class: class.name().to_string(),
            })?;
        let id = self
            .converters
            .to_wire(identifier_kind(class, id_field)?, &id)?;

        let mut reference = WireDocument::new();
        reference.insert(
            self.config.prefixed("ref"),
            WireValue::Text(class.collection().to_string()),
        );
        reference.insert(self.config.prefixed("id"), id);
        reference.insert(
            self.config.prefixed("db"),
            WireValue::Text(
                class
                    .database()
                    .unwrap_or(&self.config.default_database)
                    .to_string(),
            ),
        );

        if !association.is_pinned() {
            let key = association.discriminator_field_or(&self.config.discriminator_field);
            let code = association.discriminator_value(class.name())?;
            reference.insert(key, WireValue::Text(code.to_string()));
        }

        Ok(ShapedReference::Resolved(reference))
    }

    /// Recover the target class and identifier from a stored reference.
    ///
    /// The class is the pinned target, else the discriminator mapped through
    /// the association's map (unmapped codes are taken as class names).
    pub fn resolve_reference(
        &self,
        association: &Association,
        reference: &WireDocument,
    ) -> Result<ReferenceTarget, TranslateError> {
        let class_name = match &association.target {
            Some(target) => target.clone(),
            None => {
                let key = association.discriminator_field_or(&self.config.discriminator_field);
                match reference.get(key) {
                    Some(WireValue::Text(code)) => {
                        association.class_for_discriminator(code).to_string()
                    }
                    _ => {
                        return Err(ReferenceError::MissingDiscriminator {
                            field: key.to_string(),
                        }
                        .into());
                    }
                }
            }
        };

        let class = self.metadata.require_class(&class_name)?;
        let id_key = self.config.prefixed("id");
        let wire_id = reference
            .get(&id_key)
            .filter(|id| !id.is_null())
            .ok_or(ReferenceError::MissingKey { key: id_key })?;
        let id_field = class
            .identifier()
            .ok_or_else(|| MappingError::MissingIdentifier {
                class: class_name.clone(),
            })?;
        let id = self
            .converters
            .to_value(identifier_kind(class, id_field)?, wire_id)?;

        Ok(ReferenceTarget { class_name, id })
    }

    fn target_class(&self, association: &Association) -> Result<&'a ClassMetadata, TranslateError> {
        let target = association
            .target
            .as_deref()
            .ok_or(MappingError::MissingTargetType)?;

        Ok(self.metadata.require_class(target)?)
    }
}
