//! Error types for the SQLite front end.

use sqlforge_core::GenerateError;

/// Errors that can occur while forging artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// Normalization, extraction or synthesis failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// Database error while connecting.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading statements or configuration).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or output serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request did not finish within the configured time.
    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    /// Neither the command line nor the configuration names a database.
    #[error("No database URL given; pass --database or set DATABASE_URL")]
    MissingDatabaseUrl,
}

/// Result type for forge operations.
pub type Result<T> = std::result::Result<T, ForgeError>;
