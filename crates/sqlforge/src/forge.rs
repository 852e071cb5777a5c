//! Timeout-bounded generation and text output.

use sqlforge_core::metadata::Describe;
use sqlforge_core::{Generation, GenerationRequest, Generator};
use tracing::warn;

use crate::config::ForgeConfig;
use crate::error::{ForgeError, Result};

/// Runs one request through the core pipeline, giving up after
/// `config.describe_timeout_secs`.
///
/// # Errors
///
/// Returns `Timeout` when the bound is hit and `Generate` for any
/// pipeline failure. No partial result is returned.
pub async fn forge<D: Describe>(
    request: &GenerationRequest,
    describer: &D,
    config: &ForgeConfig,
) -> Result<Generation> {
    let generator = Generator::new(config.synthesis.clone());
    match tokio::time::timeout(
        config.describe_timeout(),
        generator.generate(request, describer),
    )
    .await
    {
        Ok(generation) => Ok(generation?),
        Err(_) => {
            warn!(
                domain = %request.domain,
                secs = config.describe_timeout_secs,
                "Generation timed out"
            );
            Err(ForgeError::Timeout(config.describe_timeout_secs))
        }
    }
}

/// Renders a generation for a terminal: the normalized statement, then
/// each artifact under a comment header with its imports.
#[must_use]
pub fn render_text(generation: &Generation) -> String {
    let mut out = format!(
        "// {} statement\n// {}\n",
        generation.kind,
        generation.metadata.sql()
    );
    for artifact in &generation.artifacts {
        out.push_str(&format!("\n// ---- {:?} {}\n", artifact.kind, artifact.name));
        // Shapes carry their imports in the source already.
        if !artifact.source.starts_with("import ") {
            for import in &artifact.imports {
                out.push_str(&format!("import {import};\n"));
            }
            if !artifact.imports.is_empty() {
                out.push('\n');
            }
        }
        out.push_str(&artifact.source);
    }
    out
}
