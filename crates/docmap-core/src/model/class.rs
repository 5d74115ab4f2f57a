use crate::model::{FieldKind, FieldMapping, MappingError};
use convert_case::{Case, Casing};
use docmap_primitives::ScalarKind;
use std::collections::BTreeSet;

///
/// ClassDiscriminator
///
/// Class-level discriminator written into every stored document of a
/// polymorphic class.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassDiscriminator {
    pub field: String,
    pub value: String,
}

///
/// ClassMetadata
///
/// Validated mapping for one class. Build with [`ClassMetadata::document`] or
/// [`ClassMetadata::embedded`].
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassMetadata {
    name: String,
    collection: String,
    database: Option<String>,
    embedded: bool,
    discriminator: Option<ClassDiscriminator>,
    fields: Vec<FieldMapping>,
    identifier: Option<usize>,
}

impl ClassMetadata {
    /// Start a top-level document class.
    #[must_use]
    pub fn document(name: impl Into<String>) -> ClassMetadataBuilder {
        ClassMetadataBuilder::new(name.into(), false)
    }

    /// Start an embedded class; it owns no collection of its own.
    #[must_use]
    pub fn embedded(name: impl Into<String>) -> ClassMetadataBuilder {
        ClassMetadataBuilder::new(name.into(), true)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        self.embedded
    }

    #[must_use]
    pub const fn discriminator(&self) -> Option<&ClassDiscriminator> {
        self.discriminator.as_ref()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, field_name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    #[must_use]
    pub fn identifier(&self) -> Option<&FieldMapping> {
        self.identifier.map(|idx| &self.fields[idx])
    }

    /// Return whether a non-identifier field is stored under `name`.
    #[must_use]
    pub fn stores_wire_name(&self, name: &str) -> bool {
        self.fields
            .iter()
            .any(|field| !field.is_identifier && field.name == name)
    }

    /// Scalar kind of the identifier field, if the class has one.
    #[must_use]
    pub fn identifier_kind(&self) -> Option<ScalarKind> {
        match self.identifier()?.kind {
            FieldKind::Scalar(kind) => Some(kind),
            _ => None,
        }
    }
}

///
/// ClassMetadataBuilder
///

#[derive(Debug)]
pub struct ClassMetadataBuilder {
    name: String,
    collection: Option<String>,
    database: Option<String>,
    embedded: bool,
    discriminator: Option<ClassDiscriminator>,
    fields: Vec<FieldMapping>,
}

impl ClassMetadataBuilder {
    const fn new(name: String, embedded: bool) -> Self {
        Self {
            name,
            collection: None,
            database: None,
            embedded,
            discriminator: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn discriminator(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.discriminator = Some(ClassDiscriminator {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldMapping>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Validate field-level invariants and freeze the class.
    pub fn build(self) -> Result<ClassMetadata, MappingError> {
        let mut identifier = None;
        let mut wire_names = BTreeSet::new();

        for (idx, field) in self.fields.iter().enumerate() {
            if field.is_identifier {
                if identifier.is_some() {
                    return Err(MappingError::DuplicateIdentifier {
                        class: self.name.clone(),
                    });
                }
                match field.kind {
                    FieldKind::Scalar(kind) if kind.is_identifier_capable() => {}
                    FieldKind::Scalar(kind) | FieldKind::Increment(kind) => {
                        return Err(MappingError::InvalidIdentifierKind {
                            class: self.name.clone(),
                            field: field.field_name.clone(),
                            kind,
                        });
                    }
                    _ => {
                        return Err(MappingError::IdentifierNotScalar {
                            class: self.name.clone(),
                            field: field.field_name.clone(),
                        });
                    }
                }
                identifier = Some(idx);
                continue;
            }

            if let FieldKind::Increment(kind) = field.kind
                && !kind.is_numeric()
            {
                return Err(MappingError::NonNumericIncrement {
                    class: self.name.clone(),
                    field: field.field_name.clone(),
                    kind,
                });
            }

            if field.name.is_empty() || field.name.contains('.') {
                return Err(MappingError::InvalidWireName {
                    class: self.name.clone(),
                    name: field.name.clone(),
                });
            }
            if !wire_names.insert(field.name.as_str()) {
                return Err(MappingError::DuplicateWireName {
                    class: self.name.clone(),
                    name: field.name.clone(),
                });
            }
        }

        if let Some(discriminator) = &self.discriminator
            && wire_names.contains(discriminator.field.as_str())
        {
            return Err(MappingError::ReservedWireName {
                class: self.name.clone(),
                name: discriminator.field.clone(),
            });
        }

        let collection = self
            .collection
            .unwrap_or_else(|| default_collection_name(&self.name));

        Ok(ClassMetadata {
            name: self.name,
            collection,
            database: self.database,
            embedded: self.embedded,
            discriminator: self.discriminator,
            fields: self.fields,
            identifier,
        })
    }
}

// Snake-cased short class name: `app::model::UserProfile` -> `user_profile`.
fn default_collection_name(class: &str) -> String {
    let short = class
        .rsplit(|c| c == ':' || c == '\\' || c == '.')
        .next()
        .unwrap_or(class);

    short.to_case(Case::Snake)
}
