//! Tests for the SQLite describer and the forge entry point.

mod common;

use std::error::Error as _;
use std::time::Duration;

use sqlforge::{forge, render_text, ForgeConfig, ForgeError, SqliteDescriber};
use sqlforge_core::codegen::ArtifactKind;
use sqlforge_core::metadata::{
    Describe, DescribedColumn, ParameterDescription, StatementDescription, StatementMetadata,
};
use sqlforge_core::type_map::HostType;
use sqlforge_core::{ErrorKind, GenerationRequest, StatementKind};

use common::{memory_pool, shop};

/// Describer that never answers within a test's patience.
struct StalledDescriber;

impl Describe for StalledDescriber {
    type Error = std::io::Error;

    async fn describe_statement(&self, _sql: &str) -> Result<StatementDescription, Self::Error> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(StatementDescription {
            columns: vec![],
            parameters: ParameterDescription::Unknown,
        })
    }

    async fn describe_table(&self, _table: &str) -> Result<Vec<DescribedColumn>, Self::Error> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(vec![])
    }
}

// ===================================================================
// Describer
// ===================================================================

#[tokio::test]
async fn table_definition_in_table_order() {
    let describer = shop().await;
    let columns = describer.describe_table("orders").await.unwrap();

    let summary: Vec<(&str, &str, Option<bool>)> = columns
        .iter()
        .map(|c| (c.name.as_str(), c.type_name.as_str(), c.nullable))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("order_id", "INTEGER", Some(false)),
            ("customer_id", "INTEGER", Some(false)),
            ("status", "VARCHAR(20)", Some(false)),
            ("notes", "TEXT", Some(true)),
            ("total", "DECIMAL(10,2)", Some(true)),
            ("created_at", "TIMESTAMP", Some(true)),
            ("payload", "BLOB", Some(true)),
        ]
    );
}

#[tokio::test]
async fn unknown_table_is_empty() {
    let describer = shop().await;
    assert!(describer.describe_table("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn statement_is_prepared_not_executed() {
    let describer = shop().await;
    let description = describer
        .describe_statement("DELETE FROM orders WHERE order_id = :orderId")
        .await
        .unwrap();
    assert!(description.columns.is_empty());
    assert_eq!(description.parameters, ParameterDescription::Count(1));

    let description = describer
        .describe_statement("SELECT order_id, status FROM orders WHERE customer_id = :customerId")
        .await
        .unwrap();
    let names: Vec<&str> = description.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["order_id", "status"]);
    assert_eq!(description.parameters.count(), Some(1));
}

#[tokio::test]
async fn unopenable_database_is_a_database_error() {
    let err = SqliteDescriber::connect("sqlite:/nonexistent-dir/missing.db?mode=ro")
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Database(_)), "{err:?}");
}

#[tokio::test]
async fn invalid_statement_is_a_driver_error() {
    let describer = shop().await;
    assert!(describer
        .describe_statement("SELECT nope FROM missing")
        .await
        .is_err());
}

// ===================================================================
// Forge
// ===================================================================

#[tokio::test]
async fn forge_update_against_sqlite() {
    let describer = shop().await;
    let request = GenerationRequest::new(
        "UPDATE orders SET status = ?, notes = ? WHERE order_id = ? AND customer_id = ?",
        "order",
    );
    let generation = forge(&request, &describer, &ForgeConfig::default())
        .await
        .unwrap();

    assert_eq!(generation.kind, StatementKind::Update);
    let StatementMetadata::Update {
        set_columns,
        where_columns,
        ..
    } = &generation.metadata
    else {
        panic!("Expected update metadata");
    };
    assert_eq!(set_columns.len(), 2);
    assert_eq!(where_columns.len(), 2);
    assert_eq!(set_columns[0].column.vendor_type_name, "VARCHAR(20)");

    let access = generation
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::AccessMethod)
        .unwrap();
    assert!(access.source.starts_with(
        "public int updateOrder(String status, String notes, Integer orderId, Integer customerId) {"
    ));
}

#[tokio::test]
async fn forge_read_against_sqlite() {
    let describer = shop().await;
    let request = GenerationRequest::new(
        "SELECT o.order_id, o.total AS amount, o.created_at FROM orders o WHERE o.status = 'NEW'",
        "order",
    );
    let generation = forge(&request, &describer, &ForgeConfig::default())
        .await
        .unwrap();

    assert_eq!(
        generation.metadata.sql(),
        "SELECT o.order_id, o.total AS amount, o.created_at FROM orders o WHERE o.status = :status"
    );
    let StatementMetadata::Read {
        columns,
        parameters,
        ..
    } = &generation.metadata
    else {
        panic!("Expected read metadata");
    };
    let labels: Vec<&str> = columns.iter().map(|c| c.label()).collect();
    assert_eq!(labels, vec!["order_id", "amount", "created_at"]);
    assert_eq!(columns[0].mapping.host, HostType::Integer);
    assert!(!columns[0].nullable);
    assert_eq!(columns[1].mapping.host, HostType::BigDecimal);
    assert!(columns[1].nullable);
    assert_eq!(columns[2].mapping.host, HostType::LocalDateTime);
    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters[0].mapping.host, HostType::String);

    let text = render_text(&generation);
    assert!(text.starts_with("// read statement\n"));
    assert!(text.contains("public class OrderResponse {"));
    assert!(text.contains("import org.springframework.jdbc.core.namedparam.MapSqlParameterSource;"));
}

#[tokio::test]
async fn missing_table_is_connectivity() {
    let describer = shop().await;
    let request = GenerationRequest::new("DELETE FROM invoices WHERE id = 1", "invoice");
    let err = forge(&request, &describer, &ForgeConfig::default())
        .await
        .unwrap_err();
    match &err {
        ForgeError::Generate(inner) => {
            assert_eq!(inner.kind(), ErrorKind::Connectivity);
            assert!(inner.source().is_some());
        }
        other => panic!("Expected Generate error, got {other:?}"),
    }
}

#[tokio::test]
async fn forge_uses_configured_synthesis() {
    let describer = shop().await;
    let mut config = ForgeConfig::default();
    config.synthesis.builder_threshold = 1;
    config.synthesis.base_path = String::from("/api");

    let request = GenerationRequest::new("SELECT order_id, status FROM orders", "order");
    let generation = forge(&request, &describer, &config).await.unwrap();

    assert!(generation.artifacts[1].source.contains("OrderResponse row = new OrderResponse();"));
    assert!(generation.artifacts[2].source.starts_with("@GetMapping(\"/api/order\")"));
}

#[tokio::test]
async fn read_and_write_agree_on_declared_types() {
    let pool = memory_pool().await;
    sqlx::query("CREATE TABLE acct (id BIGINT NOT NULL, amount DOUBLE, code SMALLINT)")
        .execute(&pool)
        .await
        .unwrap();
    let describer = SqliteDescriber::new(pool);
    let config = ForgeConfig::default();

    let read = forge(
        &GenerationRequest::new("SELECT id, amount, code FROM acct", "account"),
        &describer,
        &config,
    )
    .await
    .unwrap();
    let StatementMetadata::Read { columns, .. } = &read.metadata else {
        panic!("Expected read metadata");
    };
    let read_hosts: Vec<HostType> = columns.iter().map(|c| c.mapping.host).collect();
    assert_eq!(read_hosts, vec![HostType::Long, HostType::Double, HostType::Short]);

    let delete = forge(
        &GenerationRequest::new(
            "DELETE FROM acct WHERE id = ? AND amount = ? AND code = ?",
            "account",
        ),
        &describer,
        &config,
    )
    .await
    .unwrap();
    let write_hosts: Vec<HostType> = delete
        .metadata
        .parameters()
        .iter()
        .map(|p| p.mapping.host)
        .collect();
    assert_eq!(write_hosts, read_hosts);
}

#[tokio::test]
async fn slow_describer_times_out() {
    let config = ForgeConfig {
        describe_timeout_secs: 1,
        ..ForgeConfig::default()
    };
    let request = GenerationRequest::new("DELETE FROM orders WHERE order_id = ?", "order");
    let err = forge(&request, &StalledDescriber, &config).await.unwrap_err();
    assert!(matches!(err, ForgeError::Timeout(1)), "{err:?}");
}
