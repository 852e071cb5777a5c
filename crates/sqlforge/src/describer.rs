//! [`Describe`] on a SQLite pool.
//!
//! Statements are prepared, never stepped. SQLite reports declared column
//! types for plain columns and `NULL` for expressions. It reports only a
//! placeholder count, no parameter types. Table definitions come from
//! `pragma_table_info`.

use sqlforge_core::metadata::{
    Describe, DescribedColumn, ParameterDescription, StatementDescription,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{Column, Executor, Statement, TypeInfo};
use tracing::debug;

/// Table definition, one row per column in table order.
pub const TABLE_INFO_SQL: &str = r#"SELECT name, type, "notnull" FROM pragma_table_info(?)"#;

/// Declared type SQLite assigns to a column declared without one.
const UNTYPED_COLUMN: &str = "BLOB";

/// Describes statements and tables through a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteDescriber {
    pool: SqlitePool,
}

impl SqliteDescriber {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a single-connection pool on `url`.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the database cannot be opened.
    pub async fn connect(url: &str) -> crate::error::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        debug!(url, "Connected");
        Ok(Self::new(pool))
    }

    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Describe for SqliteDescriber {
    type Error = sqlx::Error;

    async fn describe_statement(&self, sql: &str) -> Result<StatementDescription, sqlx::Error> {
        let statement = self.pool.prepare(sql).await?;

        let columns: Vec<DescribedColumn> = statement
            .columns()
            .iter()
            .map(|column| DescribedColumn {
                name: column.name().to_string(),
                type_name: column.type_info().name().to_string(),
                nullable: None,
            })
            .collect();
        let parameters = statement
            .parameters()
            .map_or(ParameterDescription::Unknown, |reported| {
                reported.either(
                    |types| {
                        ParameterDescription::Typed(
                            types.iter().map(|t| t.name().to_string()).collect(),
                        )
                    },
                    ParameterDescription::Count,
                )
            });

        debug!(
            columns = columns.len(),
            parameters = ?parameters.count(),
            "Prepared statement"
        );
        Ok(StatementDescription {
            columns,
            parameters,
        })
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<DescribedColumn>, sqlx::Error> {
        let rows: Vec<(String, String, i64)> = sqlx::query_as(TABLE_INFO_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        debug!(table, columns = rows.len(), "Read table definition");
        Ok(rows
            .into_iter()
            .map(|(name, declared, not_null)| DescribedColumn {
                name,
                type_name: if declared.trim().is_empty() {
                    UNTYPED_COLUMN.to_string()
                } else {
                    declared
                },
                nullable: Some(not_null == 0),
            })
            .collect())
    }
}
