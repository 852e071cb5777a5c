//! SQL parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.

mod error;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::Parser;

use crate::ast::Statement;

/// Parses a single statement.
///
/// # Errors
///
/// Returns a `ParseError` when `sql` is not exactly one valid statement.
pub fn parse(sql: &str) -> Result<Statement, ParseError> {
    Parser::new(sql).parse_statement()
}
