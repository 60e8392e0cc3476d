//! Core error types for the casper form engine.
//!
//! Three kinds of failure exist and they never mix:
//!
//! - [`SchemaError`] is raised while a field or schema is being declared. It
//!   is a programming error in the form definition and is not recoverable at
//!   validation time.
//! - [`ValidationError`] is the expected, per-field outcome of the validation
//!   pipeline. The form orchestrator catches it and records it in the error map.
//! - [`CasperError::NotValidated`] signals that clean data or errors were
//!   requested before validation ran.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A per-field validation failure.
///
/// Carries the human-readable message surfaced to the caller plus a short
/// machine-readable code (e.g. `"required"`, `"invalid"`, `"max_value"`).
///
/// # Examples
///
/// ```
/// use casper_core::error::ValidationError;
///
/// let err = ValidationError::new("This field is required", "required");
/// assert_eq!(err.to_string(), "This field is required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error message.
    pub message: String,
    /// A short code identifying the type of validation failure.
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` with the generic `"invalid"` code.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(message, "invalid")
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// An invariant violation detected while declaring a field or a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A field declared both `required = true` and a non-empty default.
    #[error("Cannot set required to True when a default is provided ({field_type})")]
    RequiredWithDefault {
        /// Type tag of the offending field.
        field_type: &'static str,
    },

    /// A choice-type field was declared without any choices.
    #[error("Required parameter choice is missing ({field_type})")]
    MissingChoices {
        /// Type tag of the offending field.
        field_type: &'static str,
    },

    /// The configured pattern is not a valid regular expression.
    #[error("Invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// Why the regex engine rejected it.
        reason: String,
    },

    /// A constraint was set on a field type that does not support it.
    #[error("Constraint `{constraint}` is not supported by {field_type}")]
    UnsupportedConstraint {
        /// Type tag of the offending field.
        field_type: &'static str,
        /// The constraint name.
        constraint: &'static str,
    },

    /// A bound (`min_value`, `max_value`) could not be interpreted for the field type.
    #[error("Invalid {constraint} `{value}` for {field_type}")]
    InvalidBound {
        /// Type tag of the offending field.
        field_type: &'static str,
        /// The constraint name.
        constraint: &'static str,
        /// The rejected bound, stringified.
        value: String,
    },

    /// A field or button was declared with an empty name.
    #[error("Field name must not be empty")]
    EmptyFieldName,

    /// A validation hook targets a field the schema does not declare.
    #[error("Validation hook registered for undeclared field `{0}`")]
    UnknownHookField(String),

    /// A declaration file named a field type that does not exist.
    #[error("Unknown field type `{0}`")]
    UnknownFieldType(String),

    /// A declaration file could not be parsed.
    #[error("Failed to parse schema declaration: {0}")]
    Parse(String),
}

/// The primary error type for the casper engine.
#[derive(Error, Debug)]
pub enum CasperError {
    /// A schema or field declaration violated an invariant.
    #[error("Schema construction error: {0}")]
    Schema(#[from] SchemaError),

    /// A value failed validation outside of form orchestration.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    /// Clean data or errors were requested before validation ran.
    #[error("Form has not been validated; call is_valid() first")]
    NotValidated,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ValidationError> for CasperError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

impl From<serde_json::Error> for CasperError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl CasperError {
    /// Returns `true` if this error signals out-of-order API usage.
    pub const fn is_usage_error(&self) -> bool {
        matches!(self, Self::NotValidated)
    }
}

/// A convenience type alias for `Result<T, CasperError>`.
pub type CasperResult<T> = Result<T, CasperError>;
