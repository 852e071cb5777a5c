//! Synthesis options.

use serde::{Deserialize, Serialize};

/// Default field count up to which result rows are assembled with a builder.
pub const DEFAULT_BUILDER_THRESHOLD: usize = 20;

/// Tunables for artifact synthesis.
///
/// Every field has a default, so a partial JSON object deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// Largest shape that is still assembled fluently.
    pub builder_threshold: usize,
    /// Name of the `NamedParameterJdbcTemplate` field access methods use.
    pub template_field: String,
    /// Name of the access-layer field route methods delegate to.
    pub repository_field: String,
    /// Prefix for route paths, e.g. `/api`.
    pub base_path: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            builder_threshold: DEFAULT_BUILDER_THRESHOLD,
            template_field: String::from("namedParameterJdbcTemplate"),
            repository_field: String::from("repository"),
            base_path: String::new(),
        }
    }
}
