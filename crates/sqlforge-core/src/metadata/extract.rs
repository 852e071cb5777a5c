//! Metadata extraction, one entry point per statement kind.
//!
//! Every extractor sends the normalized text to the database for a
//! describe round trip first. Nothing is executed. Parameter and column
//! types of write statements come from the target table's live definition.

use tracing::debug;

use super::describe::{Describe, ParameterDescription, StatementDescription};
use super::model::{BoundColumn, ColumnDescriptor, ParameterDescriptor, StatementMetadata};
use super::resolve::{ColumnResolver, ResolvedColumn, Scope};
use crate::ast::{Expr, InsertSource, Statement, StatementKind};
use crate::error::{GenerateError, Result};
use crate::rewrite::{Clause, ColumnRef, NormalizedStatement, Placeholder};
use crate::type_map::lookup;

const UNKNOWN_TYPE: &str = "UNKNOWN";

/// Extracts metadata for `normalized`, dispatching on its kind.
///
/// # Errors
///
/// See the per-kind extractors.
pub async fn extract<D: Describe>(
    normalized: &NormalizedStatement,
    describer: &D,
) -> Result<StatementMetadata> {
    match normalized.kind {
        StatementKind::Read => extract_read(normalized, describer).await,
        StatementKind::Insert => extract_insert(normalized, describer).await,
        StatementKind::Update => extract_update(normalized, describer).await,
        StatementKind::Delete => extract_delete(normalized, describer).await,
    }
}

/// Extracts result columns and parameters of a SELECT.
///
/// Result columns come from the engine's description. When the projection
/// lists as many items as the engine reports, aliases and source names are
/// taken from the projection, and plain column references are enriched
/// with the table's declared type and nullability.
///
/// # Errors
///
/// - `Structural` if the statement is not a SELECT.
/// - `Connectivity` if the database cannot describe it.
/// - `PlaceholderMismatch` if the engine counts a different number of
///   placeholders.
pub async fn extract_read<D: Describe>(
    normalized: &NormalizedStatement,
    describer: &D,
) -> Result<StatementMetadata> {
    let Statement::Select(select) = &normalized.statement else {
        return Err(wrong_kind(normalized, StatementKind::Read));
    };
    let description = describe(describer, normalized).await?;
    let scope = Scope::of(&normalized.statement);
    let mut resolver = ColumnResolver::new(describer, &normalized.sql);

    let paired = !select.has_wildcard() && select.columns.len() == description.columns.len();
    let mut columns = Vec::with_capacity(description.columns.len());
    for (index, described) in description.columns.iter().enumerate() {
        let projected = if paired {
            select.columns.get(index)
        } else {
            None
        };
        let source = match projected {
            Some(item) => column_ref(&item.expr),
            None if scope.tables().len() == 1 => Some(ColumnRef {
                table: None,
                column: described.name.clone(),
            }),
            None => None,
        };
        let declared = match &source {
            Some(column) => resolver.try_resolve(&scope, column).await?,
            None => None,
        };

        // A plain column keeps its declared type; engines report storage
        // affinities (BIGINT as INTEGER) that would diverge from writes.
        let vendor = declared
            .as_ref()
            .and_then(|d| known_type(&d.column.type_name))
            .or_else(|| known_type(&described.type_name))
            .unwrap_or(UNKNOWN_TYPE)
            .to_string();
        let nullable = described
            .nullable
            .or_else(|| declared.as_ref().and_then(|d| d.column.nullable))
            .unwrap_or(true);
        let source_name = match (projected, &source) {
            (Some(_), Some(column)) => column.column.clone(),
            _ => described.name.clone(),
        };

        columns.push(ColumnDescriptor {
            source_name,
            alias: projected.and_then(|item| item.alias.clone()),
            mapping: lookup(&vendor)?,
            vendor_type_name: vendor,
            nullable,
            ordinal_position: index + 1,
        });
    }

    let reported_types = match &description.parameters {
        ParameterDescription::Typed(types) => Some(types),
        ParameterDescription::Count(_) | ParameterDescription::Unknown => None,
    };
    let mut parameters = Vec::with_capacity(normalized.placeholders.len());
    for (index, placeholder) in normalized.placeholders.iter().enumerate() {
        let reported = reported_types
            .and_then(|types| types.get(index))
            .and_then(|t| known_type(t))
            .map(str::to_string);
        let vendor = match (reported, &placeholder.binding) {
            (Some(vendor), _) => vendor,
            (None, Some(binding)) => resolver
                .try_resolve(&scope, binding)
                .await?
                .and_then(|d| known_type(&d.column.type_name).map(str::to_string))
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
            (None, None) => UNKNOWN_TYPE.to_string(),
        };
        parameters.push(parameter(index, placeholder, vendor)?);
    }

    debug!(
        columns = columns.len(),
        parameters = parameters.len(),
        "Extracted read metadata"
    );
    Ok(StatementMetadata::Read {
        columns,
        parameters,
        sql: normalized.sql.clone(),
    })
}

/// Extracts the inserted columns of a single-row INSERT.
///
/// Without a column list, VALUES entries bind to the table's columns in
/// table order.
///
/// # Errors
///
/// - `Structural` if the statement is not an INSERT, inserts from a query,
///   has several VALUES rows, or names an unknown table or column.
/// - `Connectivity` and `PlaceholderMismatch` as for [`extract_read`].
pub async fn extract_insert<D: Describe>(
    normalized: &NormalizedStatement,
    describer: &D,
) -> Result<StatementMetadata> {
    let Statement::Insert(insert) = &normalized.statement else {
        return Err(wrong_kind(normalized, StatementKind::Insert));
    };
    match &insert.values {
        InsertSource::Query(_) => {
            return Err(structural(normalized, "INSERT ... SELECT is not supported"));
        }
        InsertSource::Values(rows) if rows.len() > 1 => {
            return Err(structural(
                normalized,
                format!("multi-row VALUES is not supported ({} rows)", rows.len()),
            ));
        }
        InsertSource::Values(_) | InsertSource::DefaultValues => {}
    }
    describe(describer, normalized).await?;

    let mut resolver = ColumnResolver::new(describer, &normalized.sql);
    let targets: Vec<String> = if insert.columns.is_empty() {
        resolver
            .table_columns(&insert.table)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect()
    } else {
        insert.columns.clone()
    };

    let mut columns = Vec::with_capacity(normalized.placeholders.len());
    for (index, placeholder) in normalized.placeholders.iter().enumerate() {
        let Clause::Values { index: slot } = placeholder.clause else {
            return Err(structural(
                normalized,
                format!("placeholder :{} is not a VALUES entry", placeholder.name),
            ));
        };
        let target = targets.get(slot).ok_or_else(|| {
            structural(
                normalized,
                format!("VALUES entry {} has no matching column", slot + 1),
            )
        })?;
        let resolved = resolver.column_of(&insert.table, target).await?;
        columns.push(bound_column(index, placeholder, resolved)?);
    }

    debug!(table = %insert.table, columns = columns.len(), "Extracted insert metadata");
    Ok(StatementMetadata::Insert {
        table: insert.table.clone(),
        columns,
        sql: normalized.sql.clone(),
    })
}

/// Extracts the SET and WHERE columns of an UPDATE.
///
/// SET placeholders bind to the target table. Filter placeholders are
/// resolved through table aliases across the whole statement.
///
/// # Errors
///
/// - `Structural` if the statement is not an UPDATE, or a placeholder is
///   not tied to a known column.
/// - `Connectivity` and `PlaceholderMismatch` as for [`extract_read`].
pub async fn extract_update<D: Describe>(
    normalized: &NormalizedStatement,
    describer: &D,
) -> Result<StatementMetadata> {
    let Statement::Update(update) = &normalized.statement else {
        return Err(wrong_kind(normalized, StatementKind::Update));
    };
    describe(describer, normalized).await?;

    let scope = Scope::of(&normalized.statement);
    let mut resolver = ColumnResolver::new(describer, &normalized.sql);
    let mut set_columns = Vec::new();
    let mut where_columns = Vec::new();
    for (index, placeholder) in normalized.placeholders.iter().enumerate() {
        let binding = require_binding(normalized, placeholder)?;
        if placeholder.clause == Clause::Set {
            let resolved = resolver.column_of(&update.table, &binding.column).await?;
            set_columns.push(bound_column(index, placeholder, resolved)?);
        } else {
            let resolved = resolver.resolve(&scope, binding).await?;
            where_columns.push(bound_column(index, placeholder, resolved)?);
        }
    }

    debug!(
        table = %update.table,
        set = set_columns.len(),
        filters = where_columns.len(),
        "Extracted update metadata"
    );
    Ok(StatementMetadata::Update {
        table: update.table.clone(),
        set_columns,
        where_columns,
        sql: normalized.sql.clone(),
    })
}

/// Extracts the WHERE columns of a DELETE.
///
/// # Errors
///
/// - `Structural` if the statement is not a DELETE, or a placeholder is
///   not tied to a known column.
/// - `Connectivity` and `PlaceholderMismatch` as for [`extract_read`].
pub async fn extract_delete<D: Describe>(
    normalized: &NormalizedStatement,
    describer: &D,
) -> Result<StatementMetadata> {
    let Statement::Delete(delete) = &normalized.statement else {
        return Err(wrong_kind(normalized, StatementKind::Delete));
    };
    describe(describer, normalized).await?;

    let scope = Scope::of(&normalized.statement);
    let mut resolver = ColumnResolver::new(describer, &normalized.sql);
    let mut where_columns = Vec::new();
    for (index, placeholder) in normalized.placeholders.iter().enumerate() {
        let binding = require_binding(normalized, placeholder)?;
        let resolved = resolver.resolve(&scope, binding).await?;
        where_columns.push(bound_column(index, placeholder, resolved)?);
    }

    debug!(table = %delete.table, filters = where_columns.len(), "Extracted delete metadata");
    Ok(StatementMetadata::Delete {
        table: delete.table.clone(),
        where_columns,
        sql: normalized.sql.clone(),
    })
}

async fn describe<D: Describe>(
    describer: &D,
    normalized: &NormalizedStatement,
) -> Result<StatementDescription> {
    debug!(sql = %normalized.sql, "Describing statement");
    let description = describer
        .describe_statement(&normalized.sql)
        .await
        .map_err(|source| GenerateError::Connectivity {
            sql: normalized.sql.clone(),
            source: Box::new(source),
        })?;

    if let Some(count) = description.parameters.count() {
        if count != normalized.placeholders.len() {
            return Err(GenerateError::PlaceholderMismatch {
                expected: count,
                found: normalized.placeholders.len(),
            });
        }
    }
    Ok(description)
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

/// `None` for blank names and SQLite's `NULL` pseudo-type.
fn known_type(type_name: &str) -> Option<&str> {
    let trimmed = type_name.trim();
    (!trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("NULL")).then_some(trimmed)
}

fn parameter(
    index: usize,
    placeholder: &Placeholder,
    vendor_type_name: String,
) -> Result<ParameterDescriptor> {
    Ok(ParameterDescriptor {
        position: index + 1,
        name: (!placeholder.generic).then(|| placeholder.name.clone()),
        placeholder: placeholder.name.clone(),
        mapping: lookup(&vendor_type_name)?,
        vendor_type_name,
    })
}

fn bound_column(
    index: usize,
    placeholder: &Placeholder,
    resolved: ResolvedColumn,
) -> Result<BoundColumn> {
    let vendor = known_type(&resolved.column.type_name)
        .unwrap_or(UNKNOWN_TYPE)
        .to_string();
    let parameter = parameter(index, placeholder, vendor.clone())?;
    let column = ColumnDescriptor {
        source_name: resolved.column.name,
        alias: None,
        mapping: parameter.mapping,
        vendor_type_name: vendor,
        nullable: resolved.column.nullable.unwrap_or(true),
        ordinal_position: resolved.ordinal_position,
    };
    Ok(BoundColumn { parameter, column })
}

fn require_binding<'a>(
    normalized: &NormalizedStatement,
    placeholder: &'a Placeholder,
) -> Result<&'a ColumnRef> {
    placeholder.binding.as_ref().ok_or_else(|| {
        structural(
            normalized,
            format!("placeholder :{} is not tied to a column", placeholder.name),
        )
    })
}

fn structural(normalized: &NormalizedStatement, reason: impl Into<String>) -> GenerateError {
    GenerateError::structural(&normalized.sql, reason)
}

fn wrong_kind(normalized: &NormalizedStatement, expected: StatementKind) -> GenerateError {
    structural(
        normalized,
        format!(
            "expected a {expected} statement, found {}",
            normalized.kind
        ),
    )
}
