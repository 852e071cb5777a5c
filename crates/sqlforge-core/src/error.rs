//! Error types for normalization, extraction and synthesis.

use crate::metadata::DescribeError;
use crate::parser::ParseError;

/// Broad failure classes a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The statement cannot be parsed or has an unsupported shape.
    Structural,
    /// The database could not describe the statement.
    Connectivity,
    /// A caller or collaborator broke an invariant.
    ContractViolation,
}

/// Errors that can occur while turning a statement into artifacts.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The statement text is not valid SQL.
    #[error("Failed to parse statement: {source}")]
    Parse {
        /// The statement that failed to parse.
        sql: String,
        /// The underlying parse error.
        #[source]
        source: ParseError,
    },

    /// The statement parses but cannot be processed.
    #[error("Unsupported statement: {reason}")]
    Structural {
        /// The offending statement.
        sql: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The describe round trip failed.
    #[error("Database could not describe statement: {source}")]
    Connectivity {
        /// The statement sent to the database.
        sql: String,
        /// The driver error.
        #[source]
        source: DescribeError,
    },

    /// Placeholders and bindings disagree in number.
    #[error("Placeholder count mismatch: expected {expected}, found {found}")]
    PlaceholderMismatch {
        /// Number of bindings supplied or reported.
        expected: usize,
        /// Number of placeholders in the statement.
        found: usize,
    },

    /// An input or collaborator broke an invariant.
    #[error("Contract violation: {0}")]
    ContractViolation(String),
}

impl GenerateError {
    /// Returns the failure class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } | Self::Structural { .. } => ErrorKind::Structural,
            Self::Connectivity { .. } => ErrorKind::Connectivity,
            Self::PlaceholderMismatch { .. } | Self::ContractViolation(_) => {
                ErrorKind::ContractViolation
            }
        }
    }

    pub(crate) fn structural(sql: &str, reason: impl Into<String>) -> Self {
        Self::Structural {
            sql: sql.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(sql: &str, source: ParseError) -> Self {
        Self::Parse {
            sql: sql.to_string(),
            source,
        }
    }
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerateError>;
