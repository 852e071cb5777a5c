//! sqlforge CLI
//!
//! Generates Java data-access artifacts for one SQL statement.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use sqlforge::{forge, render_text, ForgeConfig, ForgeError, SqliteDescriber};
use sqlforge_core::GenerationRequest;

/// Turns a literal-laden SQL statement into a named-parameter statement
/// and Java artifacts, typed by a live SQLite database.
#[derive(Parser)]
#[command(name = "sqlforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// Statement text.
    #[arg(long, conflicts_with = "sql_file", required_unless_present = "sql_file")]
    sql: Option<String>,

    /// File holding the statement text.
    #[arg(long)]
    sql_file: Option<PathBuf>,

    /// Business name the artifacts are named after.
    #[arg(long)]
    domain: String,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Largest shape assembled with a builder.
    #[arg(long)]
    builder_threshold: Option<usize>,

    /// Route path prefix.
    #[arg(long)]
    base_path: Option<String>,

    /// Print the generation as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<ForgeConfig, ForgeError> {
        let mut config = match &self.config {
            Some(path) => ForgeConfig::load(path)?,
            None => ForgeConfig::default(),
        };
        if let Some(url) = &self.database {
            config.database_url = Some(url.clone());
        }
        if let Some(threshold) = self.builder_threshold {
            config.synthesis.builder_threshold = threshold;
        }
        if let Some(base_path) = &self.base_path {
            config.synthesis.base_path.clone_from(base_path);
        }
        Ok(config)
    }

    fn statement(&self) -> Result<String, ForgeError> {
        match (&self.sql, &self.sql_file) {
            (Some(sql), _) => Ok(sql.clone()),
            (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
            (None, None) => Ok(String::new()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.resolve_config()?;
    let url = config
        .database_url
        .clone()
        .ok_or(ForgeError::MissingDatabaseUrl)?;
    debug!(?config, "Resolved configuration");

    let describer = SqliteDescriber::connect(&url).await?;
    let request = GenerationRequest::new(cli.statement()?, cli.domain.clone());
    let generation = forge(&request, &describer, &config).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&generation)?);
    } else {
        print!("{}", render_text(&generation));
    }

    Ok(())
}
