//! Client execution tests
//!
//! Fluent statement building, fetch cardinalities, record mapping, database
//! selection, delegation and error translation over the memory driver.

#[path = "testutils/mod.rs"]
mod testutils;

use futures::StreamExt;
use graphlink::driver::memory::ScriptedResult;
use graphlink::{
    translate_driver_error, DriverError, GraphError, Record, RecordCursor, ResultSummary,
    StaticDatabaseSelectionProvider, Statement, SummaryCounters, Value,
};
use std::collections::HashMap;
use std::sync::Arc;
use testutils::test_fixture::{node_record, TestFixture};

#[tokio::test]
async fn test_fetch_as_with_one() {
    let fixture = TestFixture::new();
    fixture
        .driver
        .enqueue_records(vec![Record::single("count(n)", 42i64)]);

    let count = fixture
        .client
        .query("MATCH (n) RETURN count(n)")
        .fetch_as::<i64>()
        .one()
        .await
        .unwrap();

    assert_eq!(count, Some(42));
}

#[tokio::test]
async fn test_one_fails_on_two_records() {
    let fixture = TestFixture::new();
    fixture.driver.enqueue_records(vec![
        Record::single("n", 1i64),
        Record::single("n", 2i64),
    ]);

    let err = fixture
        .client
        .query("MATCH (n) RETURN n")
        .fetch_as::<i64>()
        .one()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GraphError::IncorrectResultSize {
            expected: 1,
            actual: 2
        }
    ));
    // The failed execution still released its session.
    assert_eq!(fixture.driver.open_session_count(), 0);
}

#[tokio::test]
async fn test_one_succeeds_with_none_on_empty_result() {
    let fixture = TestFixture::new();

    let result = fixture
        .client
        .query("MATCH (n) RETURN n")
        .fetch_as::<i64>()
        .one()
        .await
        .unwrap();

    assert_eq!(result, None);
}

#[tokio::test]
async fn test_first_takes_the_first_of_many() {
    let fixture = TestFixture::new();
    fixture.driver.enqueue_records(vec![
        Record::single("n", 1i64),
        Record::single("n", 2i64),
        Record::single("n", 3i64),
    ]);

    let first = fixture
        .client
        .query("MATCH (n) RETURN n")
        .fetch_as::<i64>()
        .first()
        .await
        .unwrap();

    assert_eq!(first, Some(1));
}

#[tokio::test]
async fn test_all_returns_every_record() {
    let fixture = TestFixture::new();
    fixture.driver.enqueue_records(vec![
        Record::single("name", "Alice"),
        Record::single("name", "Bob"),
    ]);

    let names: Vec<String> = fixture
        .client
        .query("MATCH (p:Person) RETURN p.name")
        .fetch_as::<String>()
        .all()
        .await
        .unwrap();

    assert_eq!(names, vec!["Alice".to_string(), "Bob".to_string()]);
}

#[tokio::test]
async fn test_null_single_values_are_dropped() {
    let fixture = TestFixture::new();
    fixture.driver.enqueue_records(vec![
        Record::single("name", "Alice"),
        Record::single("name", Value::Null),
        Record::single("name", "Bob"),
    ]);

    let names: Vec<String> = fixture
        .client
        .query("MATCH (p:Person) RETURN p.name")
        .fetch_as::<String>()
        .all()
        .await
        .unwrap();

    assert_eq!(names, vec!["Alice".to_string(), "Bob".to_string()]);
}

#[tokio::test]
async fn test_fetch_returns_value_maps() {
    let fixture = TestFixture::new();
    fixture.driver.enqueue_records(vec![Record::new(
        vec!["name".to_string(), "age".to_string()],
        vec![Value::from("Alice"), Value::from(30i64)],
    )]);

    let rows = fixture
        .client
        .query("MATCH (p:Person) RETURN p.name AS name, p.age AS age")
        .fetch()
        .all()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::from("Alice")));
    assert_eq!(rows[0].get("age"), Some(&Value::from(30i64)));
}

#[tokio::test]
async fn test_mapped_by_custom_closure() {
    let fixture = TestFixture::new();
    fixture
        .driver
        .enqueue_records(vec![node_record(&["Person"], vec![("name", Value::from("Alice"))])]);

    let names: Vec<String> = fixture
        .client
        .query("MATCH (n:Person) RETURN n")
        .mapped_by(|record| {
            let node = record
                .get("n")
                .and_then(Value::as_node)
                .ok_or_else(|| GraphError::mapping("expected a node"))?;
            node.properties
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| GraphError::mapping("missing name"))
        })
        .all()
        .await
        .unwrap();

    assert_eq!(names, vec!["Alice".to_string()]);
}

#[tokio::test]
async fn test_stream_yields_all_and_releases() {
    let fixture = TestFixture::new();
    fixture.driver.enqueue_records(vec![
        Record::single("n", 1i64),
        Record::single("n", 2i64),
        Record::single("n", 3i64),
    ]);

    let mut stream = fixture
        .client
        .query("MATCH (n) RETURN n")
        .fetch_as::<i64>()
        .stream();

    let mut collected = Vec::new();
    while let Some(item) = stream.next().await {
        collected.push(item.unwrap());
    }

    assert_eq!(collected, vec![1, 2, 3]);
    assert_eq!(fixture.driver.open_session_count(), 0);
}

#[tokio::test]
async fn test_bound_parameters_reach_the_driver() {
    let fixture = TestFixture::new();

    fixture
        .client
        .query("MATCH (p:Person) WHERE p.age > $age AND p.name = $name RETURN p")
        .bind("age", 21)
        .bind("name", "Alice")
        .run()
        .await
        .unwrap();

    let executed = fixture.driver.executed_statements();
    assert_eq!(executed.len(), 1);
    let params = &executed[0].statement.parameters;
    assert_eq!(params.get("age"), Some(&Value::from(21i64)));
    assert_eq!(params.get("name"), Some(&Value::from("Alice")));
}

#[tokio::test]
async fn test_duplicate_bind_is_reported_at_execution() {
    let fixture = TestFixture::new();

    let err = fixture
        .client
        .query("RETURN $x")
        .bind("x", 1)
        .bind("x", 2)
        .fetch_as::<i64>()
        .one()
        .await
        .unwrap_err();

    assert!(matches!(err, GraphError::DuplicateParameter(name) if name == "x"));
    // Nothing was executed.
    assert!(fixture.driver.executed_statements().is_empty());
}

#[tokio::test]
async fn test_bind_all() {
    let fixture = TestFixture::new();

    let mut params = HashMap::new();
    params.insert("a".to_string(), Value::from(1i64));
    params.insert("b".to_string(), Value::from(2i64));

    fixture
        .client
        .query("RETURN $a + $b")
        .bind_all(params)
        .run()
        .await
        .unwrap();

    let executed = fixture.driver.executed_statements();
    assert_eq!(executed[0].statement.parameters.len(), 2);
}

#[tokio::test]
async fn test_query_with_defers_cypher_materialization() {
    let fixture = TestFixture::new();

    fixture
        .client
        .query_with(|| format!("MATCH (n:{}) RETURN n", "Person"))
        .run()
        .await
        .unwrap();

    assert_eq!(
        fixture.executed_cypher(),
        vec!["MATCH (n:Person) RETURN n".to_string()]
    );
}

#[tokio::test]
async fn test_in_database_targets_the_session() {
    let fixture = TestFixture::new();

    fixture
        .client
        .query("RETURN 1")
        .in_database("people")
        .run()
        .await
        .unwrap();

    let executed = fixture.driver.executed_statements();
    assert_eq!(executed[0].database.as_deref(), Some("people"));
}

#[tokio::test]
async fn test_invalid_database_name_is_rejected() {
    let fixture = TestFixture::new();

    let err = fixture
        .client
        .query("RETURN 1")
        .in_database("")
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, GraphError::InvalidDatabaseName(_)));
}

#[tokio::test]
async fn test_selection_provider_resolves_default_target() {
    let provider = Arc::new(StaticDatabaseSelectionProvider::new("tenant-1").unwrap());
    let fixture = TestFixture::with_provider(provider);

    fixture.client.query("RETURN 1").run().await.unwrap();

    let executed = fixture.driver.executed_statements();
    assert_eq!(executed[0].database.as_deref(), Some("tenant-1"));
}

#[tokio::test]
async fn test_run_returns_processed_summary() {
    let fixture = TestFixture::new();
    fixture.driver.enqueue(ScriptedResult {
        records: vec![Record::single("n", 1i64)],
        summary: ResultSummary {
            counters: SummaryCounters {
                nodes_created: 2,
                ..SummaryCounters::default()
            },
            ..ResultSummary::default()
        },
    });

    let summary = fixture
        .client
        .query("CREATE (a), (b)")
        .run()
        .await
        .unwrap();

    assert_eq!(summary.counters.nodes_created, 2);
    assert_eq!(summary.records_streamed, 1);
}

#[tokio::test]
async fn test_server_errors_are_translated() {
    let fixture = TestFixture::new();
    fixture.driver.fail_next(DriverError::server(
        "Neo.ClientError.Schema.ConstraintValidationFailed",
        "already exists",
    ));

    let err = fixture.client.query("CREATE (n)").run().await.unwrap_err();
    assert!(matches!(err, GraphError::ConstraintViolation { .. }));
}

#[tokio::test]
async fn test_untranslatable_errors_pass_through() {
    let fixture = TestFixture::new();
    fixture
        .driver
        .fail_next(DriverError::Protocol("unexpected message".to_string()));

    let err = fixture.client.query("RETURN 1").run().await.unwrap_err();
    assert!(matches!(err, GraphError::Driver(DriverError::Protocol(_))));
}

#[tokio::test]
async fn test_delegate_to_runs_against_the_runner() {
    let fixture = TestFixture::new();
    fixture
        .driver
        .enqueue_records(vec![Record::single("n", 7i64)]);

    let value = fixture
        .client
        .delegate_to(|runner| {
            Box::pin(async move {
                let mut cursor = runner
                    .run(Statement::new("MATCH (n) RETURN count(n)"))
                    .await
                    .map_err(translate_driver_error)?;
                let record = cursor.next().await.map_err(translate_driver_error)?;
                Ok(record.and_then(|r| r.single_value().and_then(Value::as_i64)))
            })
        })
        .in_database("people")
        .run()
        .await
        .unwrap();

    assert_eq!(value, Some(7));
    let executed = fixture.driver.executed_statements();
    assert_eq!(executed[0].database.as_deref(), Some("people"));
    assert_eq!(fixture.driver.open_session_count(), 0);
}
