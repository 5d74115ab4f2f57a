use crate::{
    convert::ConvertError,
    model::MappingError,
    persist::{OperationError, ReferenceError},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// TranslateError
///
/// Structured translation error with a stable classification.
/// `path` is the dotted wire path of the field being translated when the
/// failure happened; the detail is carried through recursion untouched.
///

#[derive(Debug, ThisError)]
#[error("{}", render_message(.path.as_deref(), .message))]
pub struct TranslateError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
    pub path: Option<String>,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl TranslateError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            path: None,
            detail: None,
        }
    }

    /// Prepend a field segment to the error path.
    #[must_use]
    pub fn with_field(self, field: impl AsRef<str>) -> Self {
        self.with_path_segment(field.as_ref())
    }

    /// Prepend an array index segment to the error path.
    #[must_use]
    pub fn with_index(self, index: usize) -> Self {
        self.with_path_segment(&index.to_string())
    }

    fn with_path_segment(mut self, segment: &str) -> Self {
        self.path = Some(match self.path.take() {
            Some(path) => format!("{segment}.{path}"),
            None => segment.to_string(),
        });

        self
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.class, ErrorClass::Configuration)
    }

    #[must_use]
    pub const fn mapping_error(&self) -> Option<&MappingError> {
        match &self.detail {
            Some(ErrorDetail::Mapping(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn convert_error(&self) -> Option<&ConvertError> {
        match &self.detail {
            Some(ErrorDetail::Convert(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn reference_error(&self) -> Option<&ReferenceError> {
        match &self.detail {
            Some(ErrorDetail::Reference(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn operation_error(&self) -> Option<&OperationError> {
        match &self.detail {
            Some(ErrorDetail::Operation(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin, self.class)
    }

    fn from_detail(class: ErrorClass, origin: ErrorOrigin, detail: ErrorDetail) -> Self {
        Self {
            class,
            origin,
            message: detail.to_string(),
            path: None,
            detail: Some(detail),
        }
    }
}

fn render_message(path: Option<&str>, message: &str) -> String {
    match path {
        Some(path) => format!("{path}: {message}"),
        None => message.to_string(),
    }
}

impl From<MappingError> for TranslateError {
    fn from(err: MappingError) -> Self {
        Self::from_detail(
            ErrorClass::Configuration,
            ErrorOrigin::Mapping,
            ErrorDetail::Mapping(err),
        )
    }
}

impl From<ConvertError> for TranslateError {
    fn from(err: ConvertError) -> Self {
        Self::from_detail(
            ErrorClass::InvalidValue,
            ErrorOrigin::Convert,
            ErrorDetail::Convert(err),
        )
    }
}

impl From<ReferenceError> for TranslateError {
    fn from(err: ReferenceError) -> Self {
        let class = match err {
            ReferenceError::NotPersisted { .. } => ErrorClass::Unresolved,
            ReferenceError::InvalidReferenceValue { .. }
            | ReferenceError::MissingDiscriminator { .. }
            | ReferenceError::MissingKey { .. } => ErrorClass::InvalidValue,
        };

        Self::from_detail(class, ErrorOrigin::Reference, ErrorDetail::Reference(err))
    }
}

impl From<OperationError> for TranslateError {
    fn from(err: OperationError) -> Self {
        Self::from_detail(
            ErrorClass::Conflict,
            ErrorOrigin::Operation,
            ErrorDetail::Operation(err),
        )
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`TranslateError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Convert(ConvertError),
    #[error("{0}")]
    Mapping(MappingError),
    #[error("{0}")]
    Operation(OperationError),
    #[error("{0}")]
    Reference(ReferenceError),
}

///
/// ErrorClass
/// Error taxonomy for translation failures.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Broken mapping; never a data issue.
    Configuration,
    Conflict,
    InvalidValue,
    Unresolved,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Conflict => "conflict",
            Self::InvalidValue => "invalid_value",
            Self::Unresolved => "unresolved",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Convert,
    Mapping,
    Operation,
    Reference,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Convert => "convert",
            Self::Mapping => "mapping",
            Self::Operation => "operation",
            Self::Reference => "reference",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
