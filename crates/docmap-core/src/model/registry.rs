use crate::model::{Association, ClassMetadata, MappingError};
use docmap_config::PersisterConfig;
use std::{collections::BTreeMap, sync::Arc};

///
/// MetadataSource
///
/// Read-only class lookup consumed by the persister.
///

pub trait MetadataSource {
    fn class_metadata(&self, class: &str) -> Option<&ClassMetadata>;

    /// Lookup that reports a missing class as a configuration error.
    fn require_class(&self, class: &str) -> Result<&ClassMetadata, MappingError> {
        self.class_metadata(class)
            .ok_or_else(|| MappingError::UnknownClass {
                class: class.to_string(),
            })
    }
}

///
/// MetadataRegistry
///
/// In-memory [`MetadataSource`] keyed by class name.
///

#[derive(Clone, Debug, Default)]
pub struct MetadataRegistry {
    classes: BTreeMap<String, Arc<ClassMetadata>>,
}

impl MetadataRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every class, then cross-check associations.
    pub fn from_classes(
        classes: impl IntoIterator<Item = ClassMetadata>,
    ) -> Result<Self, MappingError> {
        let mut registry = Self::new();
        for class in classes {
            registry.register(class)?;
        }
        registry.validate()?;

        Ok(registry)
    }

    pub fn register(&mut self, class: ClassMetadata) -> Result<(), MappingError> {
        if self.classes.contains_key(class.name()) {
            return Err(MappingError::DuplicateClass {
                class: class.name().to_string(),
            });
        }
        self.classes
            .insert(class.name().to_string(), Arc::new(class));

        Ok(())
    }

    #[must_use]
    pub fn get(&self, class: &str) -> Option<Arc<ClassMetadata>> {
        self.classes.get(class).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Check that every association points at a registered class of the
    /// right shape.
    ///
    /// Embedded kinds must target embedded classes; reference kinds must
    /// target document classes that have an identifier. Every class listed in
    /// a discriminator map must be registered.
    pub fn validate(&self) -> Result<(), MappingError> {
        for class in self.classes.values() {
            for field in class.fields() {
                let Some(association) = field.association() else {
                    continue;
                };
                let embedded = field.kind.is_embedded();

                if let Some(target) = &association.target {
                    self.check_target(class, &field.field_name, target, embedded)?;
                }
                if let Some(map) = &association.discriminator_map {
                    for mapped in map.classes() {
                        self.check_target(class, &field.field_name, mapped, embedded)?;
                    }
                }
                if embedded && let Some(key) = &association.discriminator_field {
                    self.check_discriminator_key(association, key)?;
                }
            }
        }

        Ok(())
    }

    /// Check that no stored field collides with the keys the persister
    /// writes from `config`: the identifier key on every class, and the
    /// default discriminator key on embedded classes reached polymorphically.
    pub fn validate_reserved_names(&self, config: &PersisterConfig) -> Result<(), MappingError> {
        for class in self.classes.values() {
            if class.stores_wire_name(&config.identifier_field) {
                return Err(MappingError::ReservedWireName {
                    class: class.name().to_string(),
                    name: config.identifier_field.clone(),
                });
            }

            for field in class.fields() {
                let Some(association) = field.association() else {
                    continue;
                };
                if field.kind.is_embedded() && association.discriminator_field.is_none() {
                    self.check_discriminator_key(association, &config.discriminator_field)?;
                }
            }
        }

        Ok(())
    }

    // An embedded value written through an unpinned association carries
    // `key`; none of the classes it may hold can store a field there.
    fn check_discriminator_key(
        &self,
        association: &Association,
        key: &str,
    ) -> Result<(), MappingError> {
        if association.is_pinned() {
            return Ok(());
        }
        let Some(map) = &association.discriminator_map else {
            return Ok(());
        };

        for mapped in map.classes() {
            let target = self.require_class(mapped)?;
            let clashes = target.stores_wire_name(key)
                || target
                    .discriminator()
                    .is_some_and(|discriminator| discriminator.field == key);
            if clashes {
                return Err(MappingError::ReservedWireName {
                    class: mapped.to_string(),
                    name: key.to_string(),
                });
            }
        }

        Ok(())
    }

    fn check_target(
        &self,
        owner: &ClassMetadata,
        field: &str,
        target: &str,
        embedded: bool,
    ) -> Result<(), MappingError> {
        let target_meta = self.require_class(target)?;

        if embedded != target_meta.is_embedded() {
            return Err(MappingError::InvalidAssociationTarget {
                class: owner.name().to_string(),
                field: field.to_string(),
                target: target.to_string(),
                expected: if embedded { "an embedded" } else { "a document" },
            });
        }
        if !embedded && target_meta.identifier().is_none() {
            return Err(MappingError::MissingIdentifier {
                class: target.to_string(),
            });
        }

        Ok(())
    }
}

impl MetadataSource for MetadataRegistry {
    fn class_metadata(&self, class: &str) -> Option<&ClassMetadata> {
        self.classes.get(class).map(Arc::as_ref)
    }
}

