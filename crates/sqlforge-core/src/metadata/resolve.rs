//! Resolution of column references against live table descriptions.

use std::collections::HashMap;

use tracing::debug;

use super::describe::{Describe, DescribedColumn};
use crate::ast::{Expr, SelectStatement, Statement, TableRef};
use crate::error::{GenerateError, Result};
use crate::rewrite::walk::nested_queries;
use crate::rewrite::ColumnRef;

/// A table visible to a statement, with the alias it goes by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScopeTable {
    pub name: String,
    pub alias: Option<String>,
}

impl ScopeTable {
    fn answers_to(&self, qualifier: &str) -> bool {
        self.alias
            .as_deref()
            .is_some_and(|alias| alias.eq_ignore_ascii_case(qualifier))
            || self.name.eq_ignore_ascii_case(qualifier)
    }
}

/// Every named table a statement mentions, target table first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Scope {
    tables: Vec<ScopeTable>,
}

impl Scope {
    pub fn of(statement: &Statement) -> Self {
        let mut scope = Self::default();
        match statement {
            Statement::Select(select) => scope.add_select(select),
            Statement::Insert(insert) => scope.push(&insert.table, None),
            Statement::Update(update) => {
                scope.push(&update.table, update.alias.as_deref());
                for assignment in &update.assignments {
                    scope.add_expr(&assignment.value);
                }
                if let Some(from) = &update.from {
                    scope.add_table_ref(from);
                }
                if let Some(filter) = &update.where_clause {
                    scope.add_expr(filter);
                }
            }
            Statement::Delete(delete) => {
                scope.push(&delete.table, delete.alias.as_deref());
                if let Some(filter) = &delete.where_clause {
                    scope.add_expr(filter);
                }
            }
        }
        scope
    }

    pub fn tables(&self) -> &[ScopeTable] {
        &self.tables
    }

    /// Finds the table a qualifier refers to. Aliases win over table names.
    pub fn find(&self, qualifier: &str) -> Option<&ScopeTable> {
        self.tables
            .iter()
            .find(|t| {
                t.alias
                    .as_deref()
                    .is_some_and(|alias| alias.eq_ignore_ascii_case(qualifier))
            })
            .or_else(|| self.tables.iter().find(|t| t.answers_to(qualifier)))
    }

    fn push(&mut self, name: &str, alias: Option<&str>) {
        let table = ScopeTable {
            name: name.to_string(),
            alias: alias.map(str::to_string),
        };
        if !self.tables.contains(&table) {
            self.tables.push(table);
        }
    }

    fn add_select(&mut self, select: &SelectStatement) {
        if let Some(from) = &select.from {
            self.add_table_ref(from);
        }
        for column in &select.columns {
            self.add_expr(&column.expr);
        }
        for filter in select.where_clause.iter().chain(&select.having) {
            self.add_expr(filter);
        }
    }

    fn add_table_ref(&mut self, table_ref: &TableRef) {
        for table in table_ref.named_tables() {
            self.push(table.name, table.alias);
        }
        self.add_derived(table_ref);
    }

    fn add_derived(&mut self, table_ref: &TableRef) {
        match table_ref {
            TableRef::Table { .. } => {}
            TableRef::Subquery { query, .. } => self.add_select(query),
            TableRef::Join { left, join } => {
                self.add_derived(left);
                self.add_derived(&join.table);
                if let Some(on) = &join.on {
                    self.add_expr(on);
                }
            }
        }
    }

    fn add_expr(&mut self, expr: &Expr) {
        for query in nested_queries(expr) {
            self.add_select(query);
        }
    }
}

/// A column found in a live table description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedColumn {
    pub ordinal_position: usize,
    pub column: DescribedColumn,
}

/// Resolves column references, describing each table at most once.
pub(crate) struct ColumnResolver<'a, D> {
    describer: &'a D,
    sql: &'a str,
    cache: HashMap<String, Vec<DescribedColumn>>,
}

impl<'a, D: Describe> ColumnResolver<'a, D> {
    pub fn new(describer: &'a D, sql: &'a str) -> Self {
        Self {
            describer,
            sql,
            cache: HashMap::new(),
        }
    }

    pub async fn table_columns(&mut self, table: &str) -> Result<Vec<DescribedColumn>> {
        let key = table.to_ascii_lowercase();
        if let Some(columns) = self.cache.get(&key) {
            return Ok(columns.clone());
        }

        debug!(table = %table, "Describing table");
        let columns = self
            .describer
            .describe_table(table)
            .await
            .map_err(|source| GenerateError::Connectivity {
                sql: self.sql.to_string(),
                source: Box::new(source),
            })?;
        self.cache.insert(key, columns.clone());
        Ok(columns)
    }

    /// Looks up `column` in `table`.
    pub async fn column_of(&mut self, table: &str, column: &str) -> Result<ResolvedColumn> {
        let columns = self.table_columns(table).await?;
        if columns.is_empty() {
            return Err(GenerateError::structural(
                self.sql,
                format!("unknown table '{table}'"),
            ));
        }
        find_column(&columns, column).ok_or_else(|| {
            GenerateError::structural(self.sql, format!("unknown column '{table}.{column}'"))
        })
    }

    /// Resolves `column` within `scope`. Unqualified names are searched
    /// table by table in scope order.
    pub async fn resolve(&mut self, scope: &Scope, column: &ColumnRef) -> Result<ResolvedColumn> {
        if let Some(qualifier) = &column.table {
            let table = scope.find(qualifier).ok_or_else(|| {
                GenerateError::structural(
                    self.sql,
                    format!("unknown table or alias '{qualifier}'"),
                )
            })?;
            let name = table.name.clone();
            return self.column_of(&name, &column.column).await;
        }

        for table in scope.tables() {
            let columns = self.table_columns(&table.name).await?;
            if let Some(found) = find_column(&columns, &column.column) {
                return Ok(found);
            }
        }
        Err(GenerateError::structural(
            self.sql,
            format!("unknown column '{}'", column.column),
        ))
    }

    /// Like [`resolve`](Self::resolve), but an unresolvable reference is
    /// `None` instead of an error. Describe failures still propagate.
    pub async fn try_resolve(
        &mut self,
        scope: &Scope,
        column: &ColumnRef,
    ) -> Result<Option<ResolvedColumn>> {
        match self.resolve(scope, column).await {
            Ok(found) => Ok(Some(found)),
            Err(GenerateError::Structural { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn find_column(columns: &[DescribedColumn], name: &str) -> Option<ResolvedColumn> {
    columns
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(name))
        .map(|index| ResolvedColumn {
            ordinal_position: index + 1,
            column: columns[index].clone(),
        })
}
