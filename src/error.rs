//! Error types for vitalsim.
//!
//! All errors are strongly typed using thiserror. Unknown ids are never
//! errors in this crate; only inconsistent metadata, invalid input ranges and
//! unreadable fixtures are.

use thiserror::Error;

/// A referenced enumeration value has no corresponding metadata entry.
///
/// This signals fixture data that is inconsistent with the schema and is
/// always propagated to the caller.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Unknown category '{value}'")]
    UnknownCategory {
        value: String,
    },

    #[error("Unknown variable type '{value}'")]
    UnknownVariableType {
        value: String,
    },

    #[error("No metadata registered for category '{category}'")]
    MissingCategoryMetadata {
        category: String,
    },

    #[error("No metadata registered for variable type '{variable_type}'")]
    MissingVariableTypeMetadata {
        variable_type: String,
    },

    #[error("Metadata for '{key}' is registered more than once")]
    DuplicateMetadata {
        key: String,
    },

    #[error("Invalid metadata for '{key}': {reason}")]
    InvalidMetadata {
        key: String,
        reason: String,
    },
}

/// Validation errors raised while building records from fixture input.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Certainty value {value} is out of range [0.0, 1.0]")]
    CertaintyOutOfRange {
        value: f64,
    },

    #[error("Personal weight {value} is out of range [0.0, 1.0]")]
    PersonalWeightOutOfRange {
        value: f64,
    },

    #[error("Identifier for '{field}' cannot be empty")]
    EmptyId {
        field: String,
    },

    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId {
        kind: String,
        id: String,
    },

    #[error("Field '{field}' must be a finite number")]
    NonFinite {
        field: String,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Certainty slider {value} is out of range [0, 100]")]
    SliderOutOfRange {
        value: u8,
    },

    #[error("Invalid engine configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Errors reading fixture files.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixtures: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse fixtures: {message}")]
    Parse {
        message: String,
    },
}

/// Top-level error type for vitalsim.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum VitalsError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fixture error: {0}")]
    Fixture(#[from] FixtureError),
}

impl VitalsError {
    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a fixture error.
    #[must_use]
    pub const fn is_fixture(&self) -> bool {
        matches!(self, Self::Fixture(_))
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for VitalsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Fixture(err.into())
    }
}

/// Result type alias for vitalsim operations.
pub type VitalsResult<T> = Result<T, VitalsError>;
