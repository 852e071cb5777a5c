//! Live statement and table description.
//!
//! Driver crates implement [`Describe`] to let the database itself report
//! result-column and parameter types. The core crate defines only the
//! trait so it stays driver-agnostic.

use std::future::Future;

/// A boxed driver error, as carried by
/// [`GenerateError::Connectivity`](crate::GenerateError::Connectivity).
pub type DescribeError = Box<dyn std::error::Error + Send + Sync>;

/// A column reported by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribedColumn {
    /// Column name, or the engine's name for an expression.
    pub name: String,
    /// Vendor type name; may be empty when the engine cannot tell.
    pub type_name: String,
    /// Nullability when the engine knows it.
    pub nullable: Option<bool>,
}

/// What the engine reports about a statement's placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterDescription {
    /// One vendor type name per placeholder.
    Typed(Vec<String>),
    /// Only the number of placeholders.
    Count(usize),
    /// Nothing.
    Unknown,
}

impl ParameterDescription {
    /// The placeholder count, if reported.
    #[must_use]
    pub fn count(&self) -> Option<usize> {
        match self {
            Self::Typed(types) => Some(types.len()),
            Self::Count(count) => Some(*count),
            Self::Unknown => None,
        }
    }
}

/// The engine's description of a prepared, unexecuted statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementDescription {
    /// Result columns, in order. Empty for statements without a result set.
    pub columns: Vec<DescribedColumn>,
    /// Placeholder information.
    pub parameters: ParameterDescription,
}

/// Prepares statements and reads table definitions without executing
/// anything.
pub trait Describe {
    /// Error type for describe failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Prepares `sql` and reports its result columns and placeholders.
    fn describe_statement(
        &self,
        sql: &str,
    ) -> impl Future<Output = Result<StatementDescription, Self::Error>> + Send;

    /// Reports the columns of `table`, in table order.
    ///
    /// An unknown table yields an empty list.
    fn describe_table(
        &self,
        table: &str,
    ) -> impl Future<Output = Result<Vec<DescribedColumn>, Self::Error>> + Send;
}
