//! Turns literal comparisons into named parameters.
//!
//! Edits are collected as byte spans of the original statement and spliced
//! in descending offset order, so two comparisons with identical text are
//! rewritten independently.

use crate::ast::{Expr, InsertSource, Literal, SelectStatement, Statement, TableRef};
use crate::error::{GenerateError, Result};
use crate::lexer::{Lexer, Span, TokenKind};
use crate::naming::to_lower_camel;

use super::decompose::leaf_comparisons;
use super::hardcode::HardcodeMarker;
use super::names::NameAllocator;
use super::walk::nested_queries;

/// Result of a literal rewrite.
#[derive(Debug)]
pub(crate) struct LiteralRewrite {
    /// The rewritten statement text.
    pub sql: String,
    /// Names generated from a position rather than a column.
    pub generic_names: Vec<String>,
}

#[derive(Debug)]
enum Replacement {
    /// Inline text, from a hardcode marker.
    Fixed(String),
    /// `{prefix}:{name}`, the name derived from `base`.
    Parameter {
        prefix: String,
        base: String,
        generic: bool,
    },
}

#[derive(Debug)]
struct Edit {
    span: Span,
    replacement: Replacement,
}

struct Collector<'s> {
    sql: &'s str,
    edits: Vec<Edit>,
}

/// Rewrites every parameterizable literal of `statement`, parsed from `sql`.
pub(crate) fn rewrite_literals(sql: &str, statement: &Statement) -> Result<LiteralRewrite> {
    let mut collector = Collector {
        sql,
        edits: Vec::new(),
    };
    collector.statement(statement)?;

    let mut edits = collector.edits;
    edits.sort_by_key(|edit| edit.span.start);

    let existing = existing_parameters(sql);
    let mut names =
        NameAllocator::with_reserved(existing.iter().filter_map(|(_, name)| name.clone()));
    let mut generic_names = Vec::new();
    let mut emitted = 0usize;
    let resolved: Vec<(Span, String)> = edits
        .into_iter()
        .map(|edit| {
            let text = match edit.replacement {
                Replacement::Fixed(text) => text,
                Replacement::Parameter {
                    prefix,
                    base,
                    generic,
                } => {
                    emitted += 1;
                    let (base, generic) = if base.is_empty() {
                        let earlier = existing
                            .iter()
                            .filter(|(start, _)| *start < edit.span.start)
                            .count();
                        (format!("param{}", emitted + earlier), true)
                    } else {
                        (base, generic)
                    };
                    let name = names.allocate(&base);
                    if generic {
                        generic_names.push(name.clone());
                    }
                    format!("{prefix}:{name}")
                }
            };
            (edit.span, text)
        })
        .collect();

    let mut out = sql.to_string();
    for (span, text) in resolved.iter().rev() {
        out.replace_range(span.start..span.end, text);
    }

    Ok(LiteralRewrite {
        sql: out,
        generic_names,
    })
}

/// Start offsets of the placeholders already in `sql`, with their names.
fn existing_parameters(sql: &str) -> Vec<(usize, Option<String>)> {
    Lexer::new(sql)
        .tokenize()
        .into_iter()
        .filter_map(|token| match token.kind {
            TokenKind::NamedParameter(name) => Some((token.span.start, Some(name))),
            TokenKind::Question => Some((token.span.start, None)),
            _ => None,
        })
        .collect()
}

/// The column a comparison operand names, looking through parentheses.
fn column_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Column { name, .. } => Some(name.as_str()),
        Expr::Paren { expr, .. } => column_name(expr),
        _ => None,
    }
}

/// A literal that may become a parameter. NULL stays NULL.
fn is_bindable(expr: &Expr) -> bool {
    expr.is_literal()
        && !matches!(
            expr,
            Expr::Literal {
                value: Literal::Null,
                ..
            }
        )
}

impl Collector<'_> {
    fn statement(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Select(select) => self.select(select),
            Statement::Insert(insert) => match &insert.values {
                InsertSource::Values(rows) if rows.len() == 1 => {
                    for (index, value) in rows[0].iter().enumerate() {
                        match insert.columns.get(index) {
                            Some(column) => self.value(value, to_lower_camel(column), false)?,
                            None => self.value(value, format!("param{}", index + 1), true)?,
                        }
                    }
                    Ok(())
                }
                InsertSource::Query(query) => self.select(query),
                InsertSource::Values(_) | InsertSource::DefaultValues => Ok(()),
            },
            Statement::Update(update) => {
                for assignment in &update.assignments {
                    self.value(&assignment.value, to_lower_camel(&assignment.column), false)?;
                }
                if let Some(from) = &update.from {
                    self.table_ref(from)?;
                }
                self.optional_filter(update.where_clause.as_ref())
            }
            Statement::Delete(delete) => self.optional_filter(delete.where_clause.as_ref()),
        }
    }

    fn select(&mut self, select: &SelectStatement) -> Result<()> {
        for column in &select.columns {
            self.queries_in(&column.expr)?;
        }
        if let Some(from) = &select.from {
            self.table_ref(from)?;
        }
        self.optional_filter(select.where_clause.as_ref())?;
        self.optional_filter(select.having.as_ref())
    }

    fn table_ref(&mut self, table_ref: &TableRef) -> Result<()> {
        match table_ref {
            TableRef::Table { .. } => Ok(()),
            TableRef::Subquery { query, .. } => self.select(query),
            TableRef::Join { left, join } => {
                self.table_ref(left)?;
                self.table_ref(&join.table)?;
                self.optional_filter(join.on.as_ref())
            }
        }
    }

    fn optional_filter(&mut self, filter: Option<&Expr>) -> Result<()> {
        match filter {
            Some(expr) => self.filter(expr),
            None => Ok(()),
        }
    }

    fn filter(&mut self, expr: &Expr) -> Result<()> {
        for leaf in leaf_comparisons(expr) {
            self.comparison(leaf)?;
        }
        self.queries_in(expr)
    }

    fn queries_in(&mut self, expr: &Expr) -> Result<()> {
        for query in nested_queries(expr) {
            self.select(query)?;
        }
        Ok(())
    }

    fn comparison(&mut self, leaf: &Expr) -> Result<()> {
        let Expr::Binary {
            left,
            op,
            right,
            span,
        } = leaf
        else {
            return Ok(());
        };
        if !op.is_comparison() {
            return Ok(());
        }

        if is_bindable(right) {
            if let Some(name) = column_name(left) {
                let replacement = self.replacement(right, String::new(), to_lower_camel(name))?;
                self.edits.push(Edit {
                    span: right.span(),
                    replacement,
                });
                return Ok(());
            }
        }
        if is_bindable(left) {
            if let Some(name) = column_name(right) {
                let prefix = format!(
                    "{} {} ",
                    right.span().text(self.sql),
                    op.mirrored().as_str()
                );
                let replacement = match self.replacement(left, prefix.clone(), to_lower_camel(name))? {
                    Replacement::Fixed(text) => Replacement::Fixed(format!("{prefix}{text}")),
                    parameter => parameter,
                };
                self.edits.push(Edit {
                    span: *span,
                    replacement,
                });
            }
        }
        Ok(())
    }

    /// SET and VALUES literals.
    fn value(&mut self, value: &Expr, base: String, generic: bool) -> Result<()> {
        if is_bindable(value) {
            let replacement = match self.replacement(value, String::new(), base)? {
                Replacement::Parameter { prefix, base, .. } => Replacement::Parameter {
                    prefix,
                    base,
                    generic,
                },
                fixed => fixed,
            };
            self.edits.push(Edit {
                span: value.span(),
                replacement,
            });
            Ok(())
        } else {
            self.queries_in(value)
        }
    }

    fn replacement(&self, literal: &Expr, prefix: String, base: String) -> Result<Replacement> {
        if let Some(text) = literal.as_str_literal() {
            let marker = HardcodeMarker::detect(text)
                .map_err(|e| GenerateError::structural(self.sql, e.to_string()))?;
            if let Some(marker) = marker {
                return Ok(Replacement::Fixed(marker.to_sql()));
            }
        }
        Ok(Replacement::Parameter {
            prefix,
            base,
            generic: false,
        })
    }
}
