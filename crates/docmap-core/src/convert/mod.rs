//! Scalar converter registry.
//!
//! One [`ValueConverter`] per [`ScalarKind`]. Embedded and reference values
//! are not converted here; the persister dispatches those itself.
pub mod scalar;

#[cfg(test)]
mod tests;

use crate::{value::Value, wire::WireValue};
use docmap_primitives::{ALL_SCALAR_KINDS, ScalarKind};
use std::{collections::BTreeMap, fmt};
use thiserror::Error as ThisError;

// re-exports
pub use scalar::{plain_from_wire, plain_to_wire};

///
/// ConvertError
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConvertError {
    #[error("expected a document, found {found}")]
    ExpectedDocument { found: &'static str },

    #[error("expected a list, found {found}")]
    ExpectedList { found: &'static str },

    #[error("no converter registered for '{kind}'")]
    NoConverter { kind: ScalarKind },

    #[error("value out of range for '{kind}'")]
    OutOfRange { kind: ScalarKind },

    #[error("cannot parse '{input}' as '{kind}': {reason}")]
    Parse {
        kind: ScalarKind,
        input: String,
        reason: String,
    },

    #[error("cannot convert {found} to '{kind}'")]
    TypeMismatch {
        kind: ScalarKind,
        found: &'static str,
    },
}

///
/// ValueConverter
///
/// Bidirectional conversion for one scalar kind. Implementations never see
/// `Null`; the registry passes it through.
///

pub trait ValueConverter: Send + Sync {
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError>;

    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError>;
}

///
/// ConverterRegistry
///

pub struct ConverterRegistry {
    converters: BTreeMap<ScalarKind, Box<dyn ValueConverter>>,
}

impl ConverterRegistry {
    /// Registry holding the default converter for every scalar kind.
    #[must_use]
    pub fn new() -> Self {
        let converters = ALL_SCALAR_KINDS
            .into_iter()
            .map(|kind| (kind, scalar::default_converter(kind)))
            .collect();

        Self { converters }
    }

    /// Registry with no converters at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            converters: BTreeMap::new(),
        }
    }

    /// Install a converter, replacing any previous one for `kind`.
    pub fn register(&mut self, kind: ScalarKind, converter: impl ValueConverter + 'static) {
        self.converters.insert(kind, Box::new(converter));
    }

    #[must_use]
    pub fn with(mut self, kind: ScalarKind, converter: impl ValueConverter + 'static) -> Self {
        self.register(kind, converter);
        self
    }

    #[must_use]
    pub fn contains(&self, kind: ScalarKind) -> bool {
        self.converters.contains_key(&kind)
    }

    pub fn to_wire(&self, kind: ScalarKind, value: &Value) -> Result<WireValue, ConvertError> {
        if value.is_null() {
            return Ok(WireValue::Null);
        }

        self.get(kind)?.to_wire(value)
    }

    pub fn to_value(&self, kind: ScalarKind, wire: &WireValue) -> Result<Value, ConvertError> {
        if wire.is_null() {
            return Ok(Value::Null);
        }

        self.get(kind)?.to_value(wire)
    }

    fn get(&self, kind: ScalarKind) -> Result<&dyn ValueConverter, ConvertError> {
        self.converters
            .get(&kind)
            .map(|converter| &**converter)
            .ok_or(ConvertError::NoConverter { kind })
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.converters.keys()).finish()
    }
}
