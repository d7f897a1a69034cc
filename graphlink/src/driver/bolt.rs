// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Bolt driver binding over `neo4rs`
//!
//! Maps the driver seam onto a pooled `neo4rs::Graph`. Two driver gaps are
//! handled here rather than papered over:
//! - `neo4rs` does not surface session bookmarks; [`Session::last_bookmark`]
//!   returns `None`, which the bookmark algebra treats as "consumed tokens
//!   removed, nothing added".
//! - `neo4rs` does not surface result summaries; the cursor synthesizes one
//!   from the number of streamed records.
//!
//! Statements run inside an explicit transaction are buffered eagerly
//! because the underlying row stream is tied to the transaction handle.

use super::traits::{GraphDriver, QueryRunner, RecordCursor, Session, Transaction};
use super::types::{
    DriverError, DriverResult, Record, ResultSummary, SessionConfig, Statement,
};
use crate::client::bookmarks::Bookmark;
use crate::config::ClientConfig;
use crate::value::{Node, Relationship, Value};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use neo4rs::{
    query, BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltNull, BoltString,
    BoltType, ConfigBuilder, Graph, Query, Row,
};
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::Arc;

/// Boxed row stream returned by `Graph::execute`. The concrete
/// `neo4rs::DetachedRowStream` is not nameable (its module is private and it
/// is not re-exported), so it is held behind the `Stream` trait it
/// implements; pull semantics are unchanged.
type BoltRowStream = Pin<Box<dyn futures::Stream<Item = neo4rs::Result<Row>> + Send>>;

/// Driver binding backed by a `neo4rs` connection pool.
#[derive(Clone)]
pub struct BoltDriver {
    graph: Arc<Graph>,
}

impl BoltDriver {
    /// Connect to a Bolt server with the given client configuration.
    pub async fn connect(config: &ClientConfig) -> DriverResult<Self> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.username)
            .password(&config.password)
            .fetch_size(config.fetch_size)
            .max_connections(config.max_connections);
        if let Some(database) = &config.database {
            builder = builder.db(database.as_str());
        }
        let driver_config = builder
            .build()
            .map_err(|e| DriverError::connection(e.to_string()))?;
        let graph = Graph::connect(driver_config)
            .await
            .map_err(|e| DriverError::connection(e.to_string()))?;
        log::info!("bolt driver: connected to {}", config.uri);
        Ok(Self {
            graph: Arc::new(graph),
        })
    }

    /// Round-trip a trivial query to check the connection.
    pub async fn verify_connectivity(&self) -> DriverResult<()> {
        self.graph
            .run(query("RETURN 1"))
            .await
            .map_err(map_driver_error)
    }
}

impl GraphDriver for BoltDriver {
    fn session(&self, config: SessionConfig) -> DriverResult<Box<dyn Session>> {
        // Bookmark seeding is accepted but cannot be forwarded; see the
        // module docs.
        if !config.bookmarks.is_empty() {
            log::trace!(
                "bolt driver: dropping {} seed bookmark(s) not supported by the driver",
                config.bookmarks.len()
            );
        }
        Ok(Box::new(BoltSession {
            graph: self.graph.clone(),
            database: config.database,
            closed: false,
        }))
    }

    fn name(&self) -> &'static str {
        "bolt"
    }
}

struct BoltSession {
    graph: Arc<Graph>,
    database: Option<String>,
    closed: bool,
}

#[async_trait]
impl QueryRunner for BoltSession {
    async fn run(&mut self, statement: Statement) -> DriverResult<Box<dyn RecordCursor>> {
        if self.closed {
            return Err(DriverError::SessionClosed);
        }
        let q = build_query(&statement)?;
        let stream = match &self.database {
            Some(db) => self
                .graph
                .execute_on(db.as_str(), q)
                .await
                .map_err(map_driver_error)?,
            None => self.graph.execute(q).await.map_err(map_driver_error)?,
        };
        Ok(Box::new(BoltCursor {
            stream: Some(Box::pin(stream.into_stream().map_ok(|row| row))),
            streamed: 0,
        }))
    }
}

#[async_trait]
impl Session for BoltSession {
    async fn begin_transaction(&mut self) -> DriverResult<Box<dyn Transaction>> {
        if self.closed {
            return Err(DriverError::SessionClosed);
        }
        let txn = match &self.database {
            Some(db) => self
                .graph
                .start_txn_on(db.as_str())
                .await
                .map_err(map_driver_error)?,
            None => self.graph.start_txn().await.map_err(map_driver_error)?,
        };
        Ok(Box::new(BoltTransaction {
            txn: Some(txn),
        }))
    }

    fn last_bookmark(&self) -> Option<Bookmark> {
        None
    }

    async fn close(&mut self) -> DriverResult<()> {
        // Connections are pooled by the graph handle; there is nothing to
        // release per session.
        self.closed = true;
        Ok(())
    }
}

struct BoltTransaction {
    txn: Option<neo4rs::Txn>,
}

#[async_trait]
impl QueryRunner for BoltTransaction {
    async fn run(&mut self, statement: Statement) -> DriverResult<Box<dyn RecordCursor>> {
        let txn = self.txn.as_mut().ok_or(DriverError::TransactionClosed)?;
        let q = build_query(&statement)?;
        let mut stream = txn.execute(q).await.map_err(map_driver_error)?;
        let mut records = VecDeque::new();
        while let Some(row) = stream.next(txn.handle()).await.map_err(map_driver_error)? {
            records.push_back(convert_row(&row)?);
        }
        Ok(Box::new(BufferedCursor {
            records,
            streamed: 0,
        }))
    }
}

#[async_trait]
impl Transaction for BoltTransaction {
    async fn commit(mut self: Box<Self>) -> DriverResult<()> {
        let txn = self.txn.take().ok_or(DriverError::TransactionClosed)?;
        txn.commit().await.map_err(map_driver_error)
    }

    async fn rollback(mut self: Box<Self>) -> DriverResult<()> {
        let txn = self.txn.take().ok_or(DriverError::TransactionClosed)?;
        txn.rollback().await.map_err(map_driver_error)
    }
}

struct BoltCursor {
    stream: Option<BoltRowStream>,
    streamed: u64,
}

#[async_trait]
impl RecordCursor for BoltCursor {
    async fn next(&mut self) -> DriverResult<Option<Record>> {
        let stream = match self.stream.as_mut() {
            Some(stream) => stream,
            None => return Ok(None),
        };
        match stream.next().await {
            Some(row) => {
                let row = row.map_err(map_driver_error)?;
                self.streamed += 1;
                Ok(Some(convert_row(&row)?))
            }
            None => Ok(None),
        }
    }

    async fn consume(&mut self) -> DriverResult<ResultSummary> {
        // Drain whatever the server still has buffered.
        while self.next().await?.is_some() {}
        self.stream = None;
        Ok(ResultSummary {
            records_streamed: self.streamed,
            ..ResultSummary::default()
        })
    }
}

struct BufferedCursor {
    records: VecDeque<Record>,
    streamed: u64,
}

#[async_trait]
impl RecordCursor for BufferedCursor {
    async fn next(&mut self) -> DriverResult<Option<Record>> {
        match self.records.pop_front() {
            Some(record) => {
                self.streamed += 1;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn consume(&mut self) -> DriverResult<ResultSummary> {
        self.records.clear();
        Ok(ResultSummary {
            records_streamed: self.streamed,
            ..ResultSummary::default()
        })
    }
}

fn map_driver_error(err: neo4rs::Error) -> DriverError {
    DriverError::Protocol(err.to_string())
}

fn build_query(statement: &Statement) -> DriverResult<Query> {
    let mut q = query(&statement.cypher);
    for (name, value) in &statement.parameters {
        q = q.param(name, value_to_bolt(value)?);
    }
    Ok(q)
}

/// The single contact point with the driver's record model: deserialize the
/// row into a column → value map. Wire column order is not available from
/// the map representation, so columns are sorted for determinism.
fn convert_row(row: &Row) -> DriverResult<Record> {
    let map: HashMap<String, BoltType> = row
        .to()
        .map_err(|e| DriverError::conversion(e.to_string()))?;
    let mut entries: Vec<(String, BoltType)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut columns = Vec::with_capacity(entries.len());
    let mut values = Vec::with_capacity(entries.len());
    for (column, bolt) in entries {
        columns.push(column);
        values.push(bolt_to_value(bolt)?);
    }
    Ok(Record::new(columns, values))
}

fn bolt_to_value(bolt: BoltType) -> DriverResult<Value> {
    Ok(match bolt {
        BoltType::Null(_) => Value::Null,
        BoltType::Boolean(b) => Value::Boolean(b.value),
        BoltType::Integer(i) => Value::Integer(i.value),
        BoltType::Float(f) => Value::Float(f.value),
        BoltType::String(s) => Value::String(s.value),
        BoltType::List(list) => {
            let mut items = Vec::with_capacity(list.value.len());
            for item in list.value {
                items.push(bolt_to_value(item)?);
            }
            Value::List(items)
        }
        BoltType::Map(map) => Value::Map(bolt_map_to_properties(map)?),
        BoltType::Node(node) => {
            let mut labels = Vec::new();
            for label in node.labels.value {
                match label {
                    BoltType::String(s) => labels.push(s.value),
                    other => {
                        return Err(DriverError::conversion(format!(
                            "unexpected node label type: {:?}",
                            other
                        )))
                    }
                }
            }
            Value::Node(Node {
                id: node.id.value,
                labels,
                properties: bolt_map_to_properties(node.properties)?,
            })
        }
        BoltType::Relation(rel) => Value::Relationship(Relationship {
            id: rel.id.value,
            start_node_id: rel.start_node_id.value,
            end_node_id: rel.end_node_id.value,
            rel_type: rel.typ.value,
            properties: bolt_map_to_properties(rel.properties)?,
        }),
        other => {
            return Err(DriverError::conversion(format!(
                "unsupported bolt value: {:?}",
                other
            )))
        }
    })
}

fn bolt_map_to_properties(map: BoltMap) -> DriverResult<HashMap<String, Value>> {
    let mut properties = HashMap::with_capacity(map.value.len());
    for (key, value) in map.value {
        properties.insert(key.value, bolt_to_value(value)?);
    }
    Ok(properties)
}

fn value_to_bolt(value: &Value) -> DriverResult<BoltType> {
    Ok(match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Boolean(b) => BoltType::Boolean(BoltBoolean::new(*b)),
        Value::Integer(i) => BoltType::Integer(BoltInteger::new(*i)),
        Value::Float(f) => BoltType::Float(BoltFloat::new(*f)),
        Value::String(s) => BoltType::String(BoltString::new(s)),
        // Temporal parameters travel as RFC 3339 strings.
        Value::DateTime(dt) => BoltType::String(BoltString::new(&dt.to_rfc3339())),
        Value::List(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.push(value_to_bolt(item)?);
            }
            BoltType::List(BoltList::from(list))
        }
        Value::Map(map) => {
            let mut bolt_map = BoltMap::new();
            for (key, item) in map {
                bolt_map.put(BoltString::new(key), value_to_bolt(item)?);
            }
            BoltType::Map(bolt_map)
        }
        Value::Node(_) | Value::Relationship(_) => {
            return Err(DriverError::conversion(
                "graph entities cannot be bound as query parameters",
            ))
        }
    })
}
