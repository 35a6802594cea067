//! Error types for the character generator

use thiserror::Error;

/// Main error type for the character generator
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Invalid template '{selector}'; must be one of: {}", valid.join(", "))]
    InvalidSelector { selector: String, valid: Vec<String> },

    #[error("Insufficient points in '{category}': requested {requested}, available {available}")]
    InsufficientPoints {
        category: String,
        requested: u32,
        available: u32,
    },

    #[error("Unknown budget category: {0}")]
    UnknownCategory(String),

    #[error(
        "Template '{template}' cannot be generated with its current data: \
         no affordable option in table '{table}' (category '{category}')"
    )]
    NoAffordableOption {
        template: String,
        table: String,
        category: String,
    },

    #[error("Internal invariant violation: {0}")]
    InternalInvariantViolation(String),

    #[error("Invalid prerequisite: {0}")]
    InvalidPrerequisite(String),

    #[error("Invalid template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeneratorError {
    /// Process exit code reported by the command-line front end
    pub fn exit_code(&self) -> u8 {
        match self {
            GeneratorError::InvalidSelector { .. } => 2,
            GeneratorError::NoAffordableOption { .. } => 3,
            GeneratorError::InvalidPrerequisite(_)
            | GeneratorError::InvalidTemplate { .. }
            | GeneratorError::Deserialization(_)
            | GeneratorError::Io(_) => 4,
            GeneratorError::InsufficientPoints { .. }
            | GeneratorError::UnknownCategory(_)
            | GeneratorError::InternalInvariantViolation(_) => 70,
        }
    }

    pub(crate) fn invalid_template(template: &str, reason: impl Into<String>) -> Self {
        GeneratorError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(err: serde_json::Error) -> Self {
        GeneratorError::Deserialization(err.to_string())
    }
}

/// Result type alias for the character generator
pub type Result<T> = std::result::Result<T, GeneratorError>;
