//! JSON configuration.
//!
//! ```json
//! {
//!   "database_url": "sqlite:shop.db",
//!   "describe_timeout_secs": 5,
//!   "synthesis": { "builder_threshold": 12, "base_path": "/api" }
//! }
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlforge_core::SynthesisOptions;
use tracing::debug;

use crate::error::Result;

/// Default bound on one generation request, in seconds.
pub const DEFAULT_DESCRIBE_TIMEOUT_SECS: u64 = 10;

/// Front-end configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// SQLite URL or path.
    pub database_url: Option<String>,
    /// Upper bound on a whole request, describe round trips included.
    pub describe_timeout_secs: u64,
    /// Code synthesis tunables.
    pub synthesis: SynthesisOptions,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            describe_timeout_secs: DEFAULT_DESCRIBE_TIMEOUT_SECS,
            synthesis: SynthesisOptions::default(),
        }
    }
}

impl ForgeConfig {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Serialization` if it is
    /// not valid JSON for this structure.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// The request timeout as a [`Duration`].
    #[must_use]
    pub const fn describe_timeout(&self) -> Duration {
        Duration::from_secs(self.describe_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ForgeConfig::default();
        assert_eq!(config.database_url, None);
        assert_eq!(config.describe_timeout(), Duration::from_secs(10));
        assert_eq!(config.synthesis, SynthesisOptions::default());
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: ForgeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ForgeConfig::default());
    }
}
