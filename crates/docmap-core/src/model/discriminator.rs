use crate::model::MappingError;
use std::collections::BTreeMap;

///
/// DiscriminatorMap
///
/// Bidirectional `code <-> class` map for polymorphic associations.
/// Both directions are built once at construction; lookups never scan.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiscriminatorMap {
    by_code: BTreeMap<String, String>,
    by_class: BTreeMap<String, String>,
}

impl DiscriminatorMap {
    /// Build a map from `(code, class)` pairs.
    ///
    /// Rejects empty codes and any code or class that appears twice.
    pub fn new<I, C, K>(entries: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (C, K)>,
        C: Into<String>,
        K: Into<String>,
    {
        let mut map = Self::default();

        for (code, class) in entries {
            let code = code.into();
            let class = class.into();

            if code.is_empty() {
                return Err(MappingError::EmptyDiscriminatorCode);
            }
            if map.by_code.contains_key(&code) {
                return Err(MappingError::DuplicateDiscriminatorCode { code });
            }
            if map.by_class.contains_key(&class) {
                return Err(MappingError::DuplicateDiscriminatorClass { class });
            }

            map.by_code.insert(code.clone(), class.clone());
            map.by_class.insert(class, code);
        }

        Ok(map)
    }

    #[must_use]
    pub fn class_for(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    #[must_use]
    pub fn code_for(&self, class: &str) -> Option<&str> {
        self.by_class.get(class).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Iterate `(code, class)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_code
            .iter()
            .map(|(code, class)| (code.as_str(), class.as_str()))
    }

    /// Iterate mapped class names in class order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.by_class.keys().map(String::as_str)
    }
}
