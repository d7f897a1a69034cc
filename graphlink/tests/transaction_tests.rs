//! Ambient transaction tests
//!
//! `with_transaction` binds an explicit transaction to the task; inner
//! executions for the same database reuse it, other databases still open
//! their own sessions, and the outcome follows the work's result.

#[path = "testutils/mod.rs"]
mod testutils;

use graphlink::driver::memory::TransactionOutcome;
use graphlink::{GraphError, Record};
use testutils::test_fixture::TestFixture;

#[tokio::test]
async fn test_inner_queries_reuse_the_ambient_transaction() {
    let fixture = TestFixture::new();
    fixture
        .driver
        .enqueue_records(vec![Record::single("n", 1i64)]);

    let value = fixture
        .client
        .with_transaction(None, |client| async move {
            client
                .query("MATCH (n) RETURN count(n)")
                .fetch_as::<i64>()
                .one()
                .await
        })
        .await
        .unwrap();

    assert_eq!(value, Some(1));

    // One session for the transaction, no extra session for the query.
    assert_eq!(fixture.driver.sessions_opened(), 1);
    let executed = fixture.driver.executed_statements();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].in_transaction);
    assert_eq!(
        fixture.driver.transaction_outcomes(),
        vec![TransactionOutcome::Committed]
    );
}

#[tokio::test]
async fn test_failure_rolls_back() {
    let fixture = TestFixture::new();

    let result: graphlink::Result<()> = fixture
        .client
        .with_transaction(None, |client| async move {
            client.query("CREATE (n)").run().await?;
            Err(GraphError::mapping("domain validation failed"))
        })
        .await;

    assert!(result.is_err());
    assert_eq!(
        fixture.driver.transaction_outcomes(),
        vec![TransactionOutcome::RolledBack]
    );
    // The session still closed and contributed a bookmark.
    assert_eq!(fixture.driver.open_session_count(), 0);
    assert_eq!(fixture.client.bookmarks().len(), 1);
}

#[tokio::test]
async fn test_other_databases_bypass_the_ambient_transaction() {
    let fixture = TestFixture::new();

    fixture
        .client
        .with_transaction(Some("orders"), |client| async move {
            // Same database: rides the transaction.
            client.query("RETURN 1").run().await?;
            // Different database: opens its own session.
            client
                .query("RETURN 2")
                .in_database("people")
                .run()
                .await?;
            Ok(())
        })
        .await
        .unwrap();

    let executed = fixture.driver.executed_statements();
    assert_eq!(executed.len(), 2);
    assert!(executed[0].in_transaction);
    assert_eq!(executed[0].database.as_deref(), Some("orders"));
    assert!(!executed[1].in_transaction);
    assert_eq!(executed[1].database.as_deref(), Some("people"));

    // The transaction session plus the bypassing session.
    assert_eq!(fixture.driver.sessions_opened(), 2);
    assert_eq!(fixture.driver.open_session_count(), 0);
}

#[tokio::test]
async fn test_with_transaction_returns_the_work_value() {
    let fixture = TestFixture::new();

    let value = fixture
        .client
        .with_transaction(None, |_client| async move { Ok(99) })
        .await
        .unwrap();

    assert_eq!(value, 99);
    assert_eq!(
        fixture.driver.transaction_outcomes(),
        vec![TransactionOutcome::Committed]
    );
}
