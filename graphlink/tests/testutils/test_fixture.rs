//! Test fixture for GraphLink integration tests
//!
//! Builds a client over the in-memory driver and keeps a handle on the
//! driver so tests can script results and inspect executed statements,
//! session bookkeeping and bookmark seeds.

use graphlink::driver::memory::MemoryDriver;
use graphlink::{
    DatabaseSelectionProvider, GraphClient, Node, Record, Value,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Test fixture with a scriptable in-memory driver behind a real client.
pub struct TestFixture {
    pub driver: MemoryDriver,
    pub client: GraphClient,
}

impl TestFixture {
    /// Create a fixture with a plain client.
    pub fn new() -> Self {
        let driver = MemoryDriver::new();
        let client = GraphClient::new(Arc::new(driver.clone()));
        TestFixture { driver, client }
    }

    /// Create a fixture whose client uses a database-selection provider.
    pub fn with_provider(provider: Arc<dyn DatabaseSelectionProvider>) -> Self {
        let driver = MemoryDriver::new();
        let client =
            GraphClient::with_database_selection_provider(Arc::new(driver.clone()), provider);
        TestFixture { driver, client }
    }

    /// The Cypher texts executed so far, in order.
    pub fn executed_cypher(&self) -> Vec<String> {
        self.driver
            .executed_statements()
            .into_iter()
            .map(|executed| executed.statement.cypher)
            .collect()
    }
}

/// A record holding one node column named `n`.
pub fn node_record(labels: &[&str], properties: Vec<(&str, Value)>) -> Record {
    let properties: HashMap<String, Value> = properties
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    Record::single(
        "n",
        Value::Node(Node {
            id: 0,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties,
        }),
    )
}
