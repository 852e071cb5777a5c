//! Statement-kind orchestration: normalize, extract, synthesize.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ast::StatementKind;
use crate::codegen::{GeneratedArtifact, SynthesisOptions, Synthesizer};
use crate::error::{GenerateError, Result};
use crate::metadata::{extract, Describe, StatementMetadata};
use crate::parser::parse;
use crate::rewrite::normalize;

/// One statement to generate artifacts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Raw statement text, literals and `?` placeholders allowed.
    pub sql: String,
    /// Business name the artifacts are named after, e.g. `order`.
    pub domain: String,
}

impl GenerationRequest {
    /// Creates a request.
    pub fn new(sql: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            domain: domain.into(),
        }
    }
}

/// The result of a generation.
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    /// Detected statement kind.
    pub kind: StatementKind,
    /// Extracted metadata, including the normalized statement text.
    pub metadata: StatementMetadata,
    /// Synthesized artifacts.
    pub artifacts: Vec<GeneratedArtifact>,
}

/// Runs the whole pipeline for one statement at a time.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    synthesizer: Synthesizer,
}

impl Generator {
    /// Creates a generator with the given synthesis options.
    #[must_use]
    pub const fn new(options: SynthesisOptions) -> Self {
        Self {
            synthesizer: Synthesizer::new(options),
        }
    }

    /// Normalizes `request.sql`, describes it through `describer`, and
    /// synthesizes artifacts named after `request.domain`.
    ///
    /// # Errors
    ///
    /// Returns `ContractViolation` for an empty statement or domain, and
    /// otherwise whatever normalization, extraction or synthesis returns.
    pub async fn generate<D: Describe>(
        &self,
        request: &GenerationRequest,
        describer: &D,
    ) -> Result<Generation> {
        if request.sql.trim().is_empty() {
            return Err(GenerateError::ContractViolation(String::from(
                "statement text is empty",
            )));
        }
        if request.domain.trim().is_empty() {
            return Err(GenerateError::ContractViolation(String::from(
                "domain name is empty",
            )));
        }

        let normalized = normalize(&request.sql)?;
        let metadata = extract(&normalized, describer).await?;
        let artifacts = self.synthesizer.synthesize(&request.domain, &metadata)?;

        info!(
            domain = %request.domain,
            kind = %normalized.kind,
            placeholders = normalized.placeholders.len(),
            artifacts = artifacts.len(),
            "Generated artifacts"
        );
        Ok(Generation {
            kind: normalized.kind,
            metadata,
            artifacts,
        })
    }
}

/// Parses `sql` and reports its statement kind.
///
/// # Errors
///
/// Returns `ContractViolation` for empty input and `Parse` for invalid SQL.
pub fn detect_kind(sql: &str) -> Result<StatementKind> {
    if sql.trim().is_empty() {
        return Err(GenerateError::ContractViolation(String::from(
            "statement text is empty",
        )));
    }
    parse(sql)
        .map(|statement| statement.kind())
        .map_err(|source| GenerateError::parse(sql, source))
}
