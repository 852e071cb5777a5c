//! Typed description of a statement's inputs and outputs.

use serde::Serialize;

use crate::ast::StatementKind;
use crate::type_map::TypeMapping;

/// A result column, or a table column a placeholder writes to or filters on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    /// Column name in the source table or expression.
    pub source_name: String,
    /// `AS` alias. `Some("")` is an explicit empty alias.
    pub alias: Option<String>,
    /// Type name as reported by the database.
    pub vendor_type_name: String,
    /// Generic mapping of `vendor_type_name`.
    pub mapping: TypeMapping,
    /// Whether the column may be NULL.
    pub nullable: bool,
    /// 1-based position in the result set or table.
    pub ordinal_position: usize,
}

impl ColumnDescriptor {
    /// The name a value is read by: the alias when there is one, even an
    /// empty one, else the source name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.source_name)
    }

    /// Generic (JDBC) type code.
    #[must_use]
    pub const fn generic_type_code(&self) -> i32 {
        self.mapping.type_code
    }
}

/// A bound placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    /// 1-based position in the statement.
    pub position: usize,
    /// Placeholder name; `None` for generic positional placeholders.
    pub name: Option<String>,
    /// The `:placeholder` in the normalized text, without the colon.
    pub placeholder: String,
    /// Type name as reported by the database.
    pub vendor_type_name: String,
    /// Generic mapping of `vendor_type_name`.
    pub mapping: TypeMapping,
}

impl ParameterDescriptor {
    /// The name to use in generated code, `param<position>` when unnamed.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("param{}", self.position))
    }
}

/// A table column paired with the placeholder that binds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundColumn {
    /// The placeholder.
    pub parameter: ParameterDescriptor,
    /// The column it writes or filters.
    pub column: ColumnDescriptor,
}

/// Everything synthesis needs to know about one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StatementMetadata {
    /// A SELECT.
    Read {
        /// Result columns, in order.
        columns: Vec<ColumnDescriptor>,
        /// Placeholders, in order.
        parameters: Vec<ParameterDescriptor>,
        /// Normalized statement text.
        sql: String,
    },
    /// An INSERT.
    Insert {
        /// Target table.
        table: String,
        /// Inserted columns with their placeholders, in VALUES order.
        columns: Vec<BoundColumn>,
        /// Normalized statement text.
        sql: String,
    },
    /// An UPDATE.
    Update {
        /// Target table.
        table: String,
        /// SET columns, in order.
        set_columns: Vec<BoundColumn>,
        /// WHERE columns, in order.
        where_columns: Vec<BoundColumn>,
        /// Normalized statement text.
        sql: String,
    },
    /// A DELETE.
    Delete {
        /// Target table.
        table: String,
        /// WHERE columns, in order.
        where_columns: Vec<BoundColumn>,
        /// Normalized statement text.
        sql: String,
    },
}

impl StatementMetadata {
    /// Returns the statement kind.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        match self {
            Self::Read { .. } => StatementKind::Read,
            Self::Insert { .. } => StatementKind::Insert,
            Self::Update { .. } => StatementKind::Update,
            Self::Delete { .. } => StatementKind::Delete,
        }
    }

    /// Returns the normalized statement text.
    #[must_use]
    pub fn sql(&self) -> &str {
        match self {
            Self::Read { sql, .. }
            | Self::Insert { sql, .. }
            | Self::Update { sql, .. }
            | Self::Delete { sql, .. } => sql,
        }
    }

    /// Every placeholder descriptor, ordered by position.
    #[must_use]
    pub fn parameters(&self) -> Vec<&ParameterDescriptor> {
        let mut parameters: Vec<&ParameterDescriptor> = match self {
            Self::Read { parameters, .. } => parameters.iter().collect(),
            Self::Insert { columns, .. } => columns.iter().map(|b| &b.parameter).collect(),
            Self::Update {
                set_columns,
                where_columns,
                ..
            } => set_columns
                .iter()
                .chain(where_columns)
                .map(|b| &b.parameter)
                .collect(),
            Self::Delete { where_columns, .. } => {
                where_columns.iter().map(|b| &b.parameter).collect()
            }
        };
        parameters.sort_by_key(|p| p.position);
        parameters
    }
}
