#[macro_use]
mod macros;

use std::fmt;

///
/// ScalarKind
///
/// Canonical scalar kind used for converter dispatch and mapping validation.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ScalarKind {
    Bin,
    Bool,
    Collection,
    Date,
    Float,
    Hash,
    Id,
    Int,
    Text,
    Timestamp,
}

impl ScalarKind {
    /// Return the full metadata descriptor for one scalar kind.
    #[must_use]
    pub const fn metadata(self) -> ScalarMetadata {
        scalar_kind_registry!(metadata_from_registry, self)
    }

    /// Resolve a kind from its mapping type name (`"int"`, `"string"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        scalar_kind_registry!(kind_from_name_registry, name)
    }

    /// Mapping type name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.metadata().name
    }

    /// Return the routing family for this scalar kind.
    #[must_use]
    pub const fn family(self) -> ScalarFamily {
        self.metadata().family
    }

    /// Return whether values of this kind support `inc` deltas.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.metadata().is_numeric
    }

    /// Return whether this kind may back a document identifier.
    #[must_use]
    pub const fn is_identifier_capable(self) -> bool {
        self.metadata().is_identifier_capable
    }

    /// Return whether this kind stores nested plain values.
    #[must_use]
    pub const fn is_container(self) -> bool {
        self.metadata().is_container
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// ScalarMetadata
///
/// Capability metadata shared by the mapping model and the converter registry.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScalarMetadata {
    pub family: ScalarFamily,
    pub name: &'static str,
    pub is_numeric: bool,
    pub is_identifier_capable: bool,
    pub is_container: bool,
}

///
/// ScalarFamily
///
/// Coarse routing family.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarFamily {
    Binary,
    Bool,
    Container,
    Identifier,
    Numeric,
    Temporal,
    Textual,
}

/// Ordered list of all scalar kinds in registry order.
pub const ALL_SCALAR_KINDS: [ScalarKind; 10] = scalar_kind_registry!(all_kinds_from_registry);

///
/// TESTS
///
