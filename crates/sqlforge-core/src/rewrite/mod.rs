//! Statement normalization.
//!
//! Turns a literal-laden statement into one that uses named placeholders
//! only:
//!
//! ```
//! use sqlforge_core::rewrite::rewrite;
//!
//! let sql = rewrite("SELECT * FROM tableC WHERE tableC.a = 1").unwrap();
//! assert_eq!(sql, "SELECT * FROM tableC WHERE tableC.a = :a");
//! ```
//!
//! Comparisons against literals become `column <op> :column`, hardcode
//! markers are inlined, and positional `?` placeholders are named after the
//! column they bind.

mod decompose;
mod hardcode;
mod literals;
pub(crate) mod names;
mod placeholders;
pub(crate) mod walk;

use std::collections::HashSet;

use tracing::debug;

pub use decompose::leaf_comparisons;
pub use hardcode::{HardcodeMarker, MalformedMarker, MARKER_PREFIX};
pub use placeholders::{bind_placeholders, Clause, ColumnRef};

use crate::ast::{Statement, StatementKind};
use crate::error::{GenerateError, Result};
use crate::naming::to_lower_camel;
use crate::parser::parse;

use names::NameAllocator;

/// A distinct named placeholder of a normalized statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Name without the colon.
    pub name: String,
    /// The column it is compared with or assigned to, if any.
    pub binding: Option<ColumnRef>,
    /// Where the first occurrence sits.
    pub clause: Clause,
    /// True when the name is the positional fallback `param<n>`.
    pub generic: bool,
}

/// A statement after normalization.
#[derive(Debug, Clone)]
pub struct NormalizedStatement {
    /// Statement text with named placeholders only.
    pub sql: String,
    /// `sql`, parsed.
    pub statement: Statement,
    /// Read, insert, update or delete.
    pub kind: StatementKind,
    /// Distinct placeholders in order of first appearance.
    pub placeholders: Vec<Placeholder>,
}

impl NormalizedStatement {
    /// Returns the placeholder names in order.
    #[must_use]
    pub fn placeholder_names(&self) -> Vec<&str> {
        self.placeholders.iter().map(|p| p.name.as_str()).collect()
    }
}

fn parse_sql(sql: &str) -> Result<Statement> {
    parse(sql).map_err(|source| GenerateError::parse(sql, source))
}

/// Normalizes `sql`.
///
/// # Errors
///
/// - `ContractViolation` for empty input.
/// - `Parse` if the statement cannot be parsed.
/// - `Structural` for a malformed hardcode marker.
pub fn normalize(sql: &str) -> Result<NormalizedStatement> {
    if sql.trim().is_empty() {
        return Err(GenerateError::ContractViolation(String::from(
            "statement text is empty",
        )));
    }

    let statement = parse_sql(sql)?;
    let rewritten = literals::rewrite_literals(sql, &statement)?;
    let mut generic: HashSet<String> = rewritten.generic_names.into_iter().collect();

    let statement = parse_sql(&rewritten.sql)?;
    let occurrences = placeholders::collect(&statement);
    let mut names = NameAllocator::with_reserved(occurrences.iter().filter_map(|o| o.name.clone()));
    let positional: Vec<String> = occurrences
        .iter()
        .filter(|o| o.name.is_none())
        .map(|o| {
            let derived = o
                .binding
                .as_ref()
                .map(|column| to_lower_camel(&column.column))
                .filter(|name| !name.is_empty());
            match derived {
                Some(base) => names.allocate(&base),
                None => {
                    let name = names.allocate(&format!("param{}", o.position));
                    generic.insert(name.clone());
                    name
                }
            }
        })
        .collect();

    let (sql_text, statement) = if positional.is_empty() {
        (rewritten.sql, statement)
    } else {
        let bound = bind_placeholders(&rewritten.sql, &positional)?;
        let statement = parse_sql(&bound)?;
        (bound, statement)
    };

    let mut seen = HashSet::new();
    let placeholders: Vec<Placeholder> = placeholders::collect(&statement)
        .into_iter()
        .filter_map(|o| {
            let name = o.name?;
            seen.insert(name.clone()).then(|| Placeholder {
                generic: generic.contains(&name),
                name,
                binding: o.binding,
                clause: o.clause,
            })
        })
        .collect();

    let kind = statement.kind();
    debug!(
        kind = %kind,
        placeholders = placeholders.len(),
        sql = %sql_text,
        "Normalized statement"
    );

    Ok(NormalizedStatement {
        sql: sql_text,
        statement,
        kind,
        placeholders,
    })
}

/// Normalizes `sql` and returns the rewritten text.
///
/// # Errors
///
/// Fails like [`normalize`].
pub fn rewrite(sql: &str) -> Result<String> {
    normalize(sql).map(|normalized| normalized.sql)
}
