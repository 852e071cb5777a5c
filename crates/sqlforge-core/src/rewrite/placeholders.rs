//! Placeholder discovery and positional binding.

use serde::{Deserialize, Serialize};

use crate::ast::{Expr, InsertSource, SelectStatement, Statement, TableRef};
use crate::error::{GenerateError, Result};
use crate::lexer::{Lexer, Span, TokenKind};

use super::walk::children;

/// A column a placeholder is compared with or assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Qualifier as written (table name or alias), if any.
    pub table: Option<String>,
    /// Column name.
    pub column: String,
}

/// Where in the statement a placeholder sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// WHERE, HAVING or a join condition.
    Filter,
    /// An UPDATE SET assignment.
    Set,
    /// An INSERT VALUES row, at the given 0-based position.
    Values {
        /// Position in the row.
        index: usize,
    },
    /// Anywhere else (projection, LIMIT, ...).
    Other,
}

/// One placeholder occurrence in a parsed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Occurrence {
    pub span: Span,
    pub name: Option<String>,
    pub position: usize,
    pub binding: Option<ColumnRef>,
    pub clause: Clause,
}

/// Replaces each positional `?` in `sql` with `:name`, in source order.
///
/// `?` inside string literals, quoted identifiers and comments is left
/// alone.
///
/// # Errors
///
/// Returns `PlaceholderMismatch` if the number of `?` placeholders differs
/// from `names.len()`, and `ContractViolation` for an empty name.
pub fn bind_placeholders<S: AsRef<str>>(sql: &str, names: &[S]) -> Result<String> {
    let spans: Vec<Span> = Lexer::new(sql)
        .tokenize()
        .into_iter()
        .filter(|token| token.kind == TokenKind::Question)
        .map(|token| token.span)
        .collect();

    if spans.len() != names.len() {
        return Err(GenerateError::PlaceholderMismatch {
            expected: names.len(),
            found: spans.len(),
        });
    }
    if names.iter().any(|name| name.as_ref().is_empty()) {
        return Err(GenerateError::ContractViolation(String::from(
            "placeholder names must not be empty",
        )));
    }

    let mut out = sql.to_string();
    for (span, name) in spans.iter().zip(names).rev() {
        out.replace_range(span.start..span.end, &format!(":{}", name.as_ref()));
    }
    Ok(out)
}

/// Finds every placeholder in `statement`, sorted by source offset.
pub(crate) fn collect(statement: &Statement) -> Vec<Occurrence> {
    let mut collector = Collector {
        found: Vec::new(),
        target: None,
    };
    collector.statement(statement);
    let mut found = collector.found;
    found.sort_by_key(|occurrence| occurrence.span.start);
    found
}

fn column_ref(expr: &Expr) -> Option<ColumnRef> {
    match expr {
        Expr::Column { table, name, .. } => Some(ColumnRef {
            table: table.clone(),
            column: name.clone(),
        }),
        Expr::Paren { expr, .. } => column_ref(expr),
        _ => None,
    }
}

struct Collector {
    found: Vec<Occurrence>,
    /// Column being assigned by the enclosing SET or VALUES entry.
    target: Option<ColumnRef>,
}

impl Collector {
    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Select(select) => self.select(select),
            Statement::Insert(insert) => match &insert.values {
                InsertSource::Values(rows) => {
                    for row in rows {
                        for (index, value) in row.iter().enumerate() {
                            let binding = insert.columns.get(index).map(|column| ColumnRef {
                                table: None,
                                column: column.clone(),
                            });
                            self.target.clone_from(&binding);
                            self.bound(value, binding, Clause::Values { index });
                        }
                        self.target = None;
                    }
                }
                InsertSource::Query(query) => self.select(query),
                InsertSource::DefaultValues => {}
            },
            Statement::Update(update) => {
                for assignment in &update.assignments {
                    let binding = ColumnRef {
                        table: None,
                        column: assignment.column.clone(),
                    };
                    self.target = Some(binding.clone());
                    self.bound(&assignment.value, Some(binding), Clause::Set);
                }
                self.target = None;
                if let Some(from) = &update.from {
                    self.table_ref(from);
                }
                if let Some(filter) = &update.where_clause {
                    self.expr(filter, Clause::Filter);
                }
            }
            Statement::Delete(delete) => {
                if let Some(filter) = &delete.where_clause {
                    self.expr(filter, Clause::Filter);
                }
            }
        }
    }

    fn select(&mut self, select: &SelectStatement) {
        let target = self.target.take();
        self.select_clauses(select);
        self.target = target;
    }

    fn select_clauses(&mut self, select: &SelectStatement) {
        for column in &select.columns {
            self.expr(&column.expr, Clause::Other);
        }
        if let Some(from) = &select.from {
            self.table_ref(from);
        }
        if let Some(filter) = &select.where_clause {
            self.expr(filter, Clause::Filter);
        }
        for expr in &select.group_by {
            self.expr(expr, Clause::Other);
        }
        if let Some(filter) = &select.having {
            self.expr(filter, Clause::Filter);
        }
        for order in &select.order_by {
            self.expr(&order.expr, Clause::Other);
        }
        for expr in select.limit.iter().chain(&select.offset) {
            self.expr(expr, Clause::Other);
        }
    }

    fn table_ref(&mut self, table_ref: &TableRef) {
        match table_ref {
            TableRef::Table { .. } => {}
            TableRef::Subquery { query, .. } => self.select(query),
            TableRef::Join { left, join } => {
                self.table_ref(left);
                self.table_ref(&join.table);
                if let Some(on) = &join.on {
                    self.expr(on, Clause::Filter);
                }
            }
        }
    }

    /// Records `expr` with `binding` if it is a placeholder, else searches it.
    fn bound(&mut self, expr: &Expr, binding: Option<ColumnRef>, clause: Clause) {
        match expr {
            Expr::Parameter {
                name,
                position,
                span,
            } => self.found.push(Occurrence {
                span: *span,
                name: name.clone(),
                position: *position,
                binding: binding.or_else(|| self.target.clone()),
                clause,
            }),
            other => self.expr(other, clause),
        }
    }

    fn expr(&mut self, expr: &Expr, clause: Clause) {
        match expr {
            Expr::Parameter { .. } => self.bound(expr, None, clause),
            Expr::Binary {
                left, op, right, ..
            } if op.is_comparison() => {
                self.bound(left, column_ref(right), clause);
                self.bound(right, column_ref(left), clause);
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                let column = column_ref(expr);
                self.expr(expr, clause);
                self.bound(low, column.clone(), clause);
                self.bound(high, column, clause);
            }
            Expr::In { expr, list, .. } => {
                let column = column_ref(expr);
                self.expr(expr, clause);
                for item in list {
                    self.bound(item, column.clone(), clause);
                }
            }
            Expr::Subquery { query, .. } | Expr::Exists { query, .. } => self.select(query),
            Expr::InSubquery { expr, query, .. } => {
                self.expr(expr, clause);
                self.select(query);
            }
            other => {
                for child in children(other) {
                    self.expr(child, clause);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_bind_in_order() {
        let bound = bind_placeholders("SELECT * FROM t WHERE a = ? AND b = ?", &["a", "b"]).unwrap();
        assert_eq!(bound, "SELECT * FROM t WHERE a = :a AND b = :b");
    }

    #[test]
    fn test_bind_ignores_question_marks_in_strings() {
        let bound = bind_placeholders("SELECT * FROM t WHERE a = '?' AND b = ?", &["b"]).unwrap();
        assert_eq!(bound, "SELECT * FROM t WHERE a = '?' AND b = :b");
    }

    #[test]
    fn test_bind_count_mismatch_names_both_counts() {
        let err = bind_placeholders("SELECT * FROM t WHERE a = ? AND b = ?", &["a"]).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::PlaceholderMismatch {
                expected: 1,
                found: 2
            }
        ));
        let message = err.to_string();
        assert!(message.contains('1') && message.contains('2'));
    }

    #[test]
    fn test_collect_bindings_and_clauses() {
        let sql = "UPDATE orders SET status = ? WHERE order_id = ? AND ? < total";
        let found = collect(&parse(sql).unwrap());
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].clause, Clause::Set);
        assert_eq!(found[0].binding.as_ref().unwrap().column, "status");
        assert_eq!(found[1].clause, Clause::Filter);
        assert_eq!(found[1].binding.as_ref().unwrap().column, "order_id");
        assert_eq!(found[2].binding.as_ref().unwrap().column, "total");
    }

    #[test]
    fn test_collect_binds_assignment_expressions_to_target() {
        let sql = "UPDATE stock SET qty = qty + ? WHERE id IN (SELECT id FROM t WHERE ? > 1)";
        let found = collect(&parse(sql).unwrap());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].clause, Clause::Set);
        assert_eq!(found[0].binding.as_ref().unwrap().column, "qty");
        assert_eq!(found[1].binding, None);
    }

    #[test]
    fn test_collect_between_and_unbound() {
        let sql = "SELECT * FROM t WHERE d BETWEEN ? AND ? LIMIT ?";
        let found = collect(&parse(sql).unwrap());
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].binding.as_ref().unwrap().column, "d");
        assert_eq!(found[1].binding.as_ref().unwrap().column, "d");
        assert_eq!(found[2].binding, None);
        assert_eq!(found[2].clause, Clause::Other);
    }
}
