#![allow(dead_code)]

use std::collections::HashMap;
use std::future::{ready, Future};
use std::io;
use std::sync::Mutex;

use sqlforge_core::ast::{DeleteStatement, InsertStatement, SelectStatement, Statement, UpdateStatement};
use sqlforge_core::metadata::{
    Describe, DescribedColumn, ParameterDescription, StatementDescription,
};
use sqlforge_core::{ParseError, Parser};

pub fn parse(sql: &str) -> Statement {
    Parser::new(sql)
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    Parser::new(sql)
        .parse_statement()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_select(sql: &str) -> SelectStatement {
    match parse(sql) {
        Statement::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> InsertStatement {
    match parse(sql) {
        Statement::Insert(i) => i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateStatement {
    match parse(sql) {
        Statement::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> DeleteStatement {
    match parse(sql) {
        Statement::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

pub fn column(name: &str, type_name: &str, nullable: bool) -> DescribedColumn {
    DescribedColumn {
        name: name.to_string(),
        type_name: type_name.to_string(),
        nullable: Some(nullable),
    }
}

/// Expression column as an engine reports it: no declared type, unknown
/// nullability.
pub fn expression_column(name: &str) -> DescribedColumn {
    DescribedColumn {
        name: name.to_string(),
        type_name: String::new(),
        nullable: None,
    }
}

/// In-memory [`Describe`] backed by fixed tables and canned statement
/// descriptions.
#[derive(Debug, Default)]
pub struct FakeDescriber {
    tables: HashMap<String, Vec<DescribedColumn>>,
    statements: HashMap<String, StatementDescription>,
    unreachable: bool,
    table_calls: Mutex<Vec<String>>,
}

impl FakeDescriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// A describer whose every call fails as if the database were down.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn with_table(mut self, name: &str, columns: Vec<DescribedColumn>) -> Self {
        self.tables.insert(name.to_ascii_lowercase(), columns);
        self
    }

    /// Registers the description returned for exactly `sql`.
    pub fn with_statement(
        mut self,
        sql: &str,
        columns: Vec<DescribedColumn>,
        parameters: ParameterDescription,
    ) -> Self {
        self.statements.insert(
            sql.to_string(),
            StatementDescription {
                columns,
                parameters,
            },
        );
        self
    }

    /// Tables described so far, in call order.
    pub fn table_calls(&self) -> Vec<String> {
        self.table_calls.lock().unwrap().clone()
    }

    fn statement(&self, sql: &str) -> io::Result<StatementDescription> {
        if self.unreachable {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"));
        }
        Ok(self
            .statements
            .get(sql)
            .cloned()
            .unwrap_or(StatementDescription {
                columns: vec![],
                parameters: ParameterDescription::Unknown,
            }))
    }

    fn table(&self, table: &str) -> io::Result<Vec<DescribedColumn>> {
        if self.unreachable {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"));
        }
        self.table_calls.lock().unwrap().push(table.to_string());
        Ok(self
            .tables
            .get(&table.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

impl Describe for FakeDescriber {
    type Error = io::Error;

    fn describe_statement(
        &self,
        sql: &str,
    ) -> impl Future<Output = Result<StatementDescription, Self::Error>> + Send {
        ready(self.statement(sql))
    }

    fn describe_table(
        &self,
        table: &str,
    ) -> impl Future<Output = Result<Vec<DescribedColumn>, Self::Error>> + Send {
        ready(self.table(table))
    }
}

/// `orders` and `customers`, typed the way SQLite reports declared types.
pub fn shop() -> FakeDescriber {
    FakeDescriber::new()
        .with_table(
            "orders",
            vec![
                column("order_id", "INTEGER", false),
                column("customer_id", "INTEGER", false),
                column("status", "VARCHAR(20)", false),
                column("notes", "TEXT", true),
                column("total", "DECIMAL(10,2)", true),
                column("created_at", "TIMESTAMP", true),
            ],
        )
        .with_table(
            "customers",
            vec![
                column("id", "INTEGER", false),
                column("name", "TEXT", false),
                column("email", "TEXT", true),
            ],
        )
}
