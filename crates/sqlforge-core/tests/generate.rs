//! End-to-end generation against an in-memory describer.

mod common;

use sqlforge_core::codegen::ArtifactKind;
use sqlforge_core::metadata::{ParameterDescription, StatementMetadata};
use sqlforge_core::{
    ErrorKind, GenerateError, GenerationRequest, Generator, StatementKind,
};

use common::{column, shop, FakeDescriber};

const UPDATE_ORDER: &str =
    "UPDATE orders SET status = ?, notes = ? WHERE order_id = ? AND customer_id = ?";

#[tokio::test]
async fn update_with_positional_placeholders() {
    let normalized_sql = "UPDATE orders SET status = :status, notes = :notes \
                          WHERE order_id = :orderId AND customer_id = :customerId";
    let describer = shop().with_statement(normalized_sql, vec![], ParameterDescription::Count(4));

    let generation = Generator::default()
        .generate(&GenerationRequest::new(UPDATE_ORDER, "order"), &describer)
        .await
        .unwrap();

    assert_eq!(generation.kind, StatementKind::Update);
    let StatementMetadata::Update {
        table,
        set_columns,
        where_columns,
        sql,
    } = &generation.metadata
    else {
        panic!("Expected update metadata, got {:?}", generation.metadata);
    };
    assert_eq!(table, "orders");
    assert_eq!(sql, normalized_sql);
    let set: Vec<&str> = set_columns.iter().map(|b| b.column.source_name.as_str()).collect();
    let filters: Vec<&str> = where_columns
        .iter()
        .map(|b| b.column.source_name.as_str())
        .collect();
    assert_eq!(set, vec!["status", "notes"]);
    assert_eq!(filters, vec!["order_id", "customer_id"]);

    let access = generation
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::AccessMethod)
        .unwrap();
    assert_eq!(access.name, "updateOrder");
    assert!(access.source.starts_with(
        "public int updateOrder(String status, String notes, Integer orderId, Integer customerId) {"
    ));
    assert!(access.source.contains(".addValue(\"orderId\", orderId)"));
}

#[tokio::test]
async fn read_with_hardcoded_filter() {
    let describer = shop().with_statement(
        "SELECT name, email FROM customers WHERE name = 'ann' AND id > :id",
        vec![column("name", "TEXT", false), column("email", "TEXT", true)],
        ParameterDescription::Count(1),
    );
    let generation = Generator::default()
        .generate(
            &GenerationRequest::new(
                "SELECT name, email FROM customers WHERE name = 'HARDCODE_AS_STRING{ann}' AND id > 10",
                "customer",
            ),
            &describer,
        )
        .await
        .unwrap();

    assert_eq!(
        generation.metadata.sql(),
        "SELECT name, email FROM customers WHERE name = 'ann' AND id > :id"
    );
    let names: Vec<&str> = generation.artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["CustomerResponse", "getCustomer", "getCustomer"]);
    assert!(generation.artifacts[1]
        .source
        .starts_with("public List<CustomerResponse> getCustomer(Integer id) {"));
    assert!(generation.artifacts[0].source.contains("private String email;"));
}

#[tokio::test]
async fn empty_inputs_are_contract_violations() {
    let describer = FakeDescriber::new();
    let generator = Generator::default();
    for request in [
        GenerationRequest::new("  ", "order"),
        GenerationRequest::new("DELETE FROM orders WHERE order_id = 1", ""),
    ] {
        let err = generator.generate(&request, &describer).await.unwrap_err();
        assert!(matches!(err, GenerateError::ContractViolation(_)), "{err:?}");
    }
    assert!(describer.table_calls().is_empty());
}

#[tokio::test]
async fn unparsable_statement_is_structural() {
    let err = Generator::default()
        .generate(&GenerationRequest::new("UPDATE SET", "order"), &shop())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[tokio::test]
async fn unreachable_database_is_connectivity() {
    let err = Generator::default()
        .generate(
            &GenerationRequest::new("DELETE FROM orders WHERE order_id = ?", "order"),
            &FakeDescriber::unreachable(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connectivity);
}

#[test]
fn request_deserializes_from_json() {
    let request: GenerationRequest =
        serde_json::from_str(r#"{"sql": "SELECT 1", "domain": "report"}"#).unwrap();
    assert_eq!(request, GenerationRequest::new("SELECT 1", "report"));
}
