// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory reference driver
//!
//! A fully in-process driver binding with deterministic bookmarks. Results
//! are scripted: callers enqueue the records and summary a statement should
//! produce, and the driver records every executed statement for inspection.
//! This is the binding the test-suite and the CLI demo mode run against.

use super::traits::{GraphDriver, QueryRunner, RecordCursor, Session, Transaction};
use super::types::{
    DriverError, DriverResult, Record, ResultSummary, SessionConfig, Statement,
};
use crate::client::bookmarks::Bookmark;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// A scripted response for one statement.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResult {
    pub records: Vec<Record>,
    pub summary: ResultSummary,
}

impl ScriptedResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            summary: ResultSummary::default(),
        }
    }

    pub fn with_summary(summary: ResultSummary) -> Self {
        Self {
            records: Vec::new(),
            summary,
        }
    }
}

/// A statement executed against the memory driver, kept for inspection.
#[derive(Debug, Clone)]
pub struct ExecutedStatement {
    pub statement: Statement,
    pub database: Option<String>,
    pub in_transaction: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    Committed,
    RolledBack,
}

#[derive(Default)]
struct MemoryState {
    responses: Mutex<VecDeque<ScriptedResult>>,
    failures: Mutex<VecDeque<DriverError>>,
    statements: Mutex<Vec<ExecutedStatement>>,
    session_seeds: Mutex<Vec<HashSet<Bookmark>>>,
    transaction_outcomes: Mutex<Vec<TransactionOutcome>>,
    open_sessions: AtomicUsize,
    sessions_opened: AtomicUsize,
    bookmark_seq: AtomicU64,
}

impl MemoryState {
    fn next_result(&self) -> DriverResult<ScriptedResult> {
        if let Some(failure) = self.failures.lock().pop_front() {
            return Err(failure);
        }
        Ok(self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(ScriptedResult::empty))
    }

    fn record_statement(&self, statement: ExecutedStatement) {
        self.statements.lock().push(statement);
    }
}

/// The in-memory driver binding.
#[derive(Clone, Default)]
pub struct MemoryDriver {
    state: Arc<MemoryState>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue the result the next executed statement will produce.
    /// Responses are consumed in FIFO order; once the queue is empty every
    /// statement yields an empty result.
    pub fn enqueue(&self, result: ScriptedResult) {
        self.state.responses.lock().push_back(result);
    }

    /// Enqueue records for the next executed statement.
    pub fn enqueue_records(&self, records: Vec<Record>) {
        self.enqueue(ScriptedResult::with_records(records));
    }

    /// Make the next executed statement fail with the given error.
    pub fn fail_next(&self, error: DriverError) {
        self.state.failures.lock().push_back(error);
    }

    /// All statements executed so far, in order.
    pub fn executed_statements(&self) -> Vec<ExecutedStatement> {
        self.state.statements.lock().clone()
    }

    /// Bookmark seeds of every session opened so far, in order.
    pub fn session_seeds(&self) -> Vec<HashSet<Bookmark>> {
        self.state.session_seeds.lock().clone()
    }

    /// Outcomes of every finished explicit transaction, in order.
    pub fn transaction_outcomes(&self) -> Vec<TransactionOutcome> {
        self.state.transaction_outcomes.lock().clone()
    }

    /// Number of sessions currently open.
    pub fn open_session_count(&self) -> usize {
        self.state.open_sessions.load(Ordering::SeqCst)
    }

    /// Number of sessions opened over the driver's lifetime.
    pub fn sessions_opened(&self) -> usize {
        self.state.sessions_opened.load(Ordering::SeqCst)
    }
}

impl GraphDriver for MemoryDriver {
    fn session(&self, config: SessionConfig) -> DriverResult<Box<dyn Session>> {
        self.state.open_sessions.fetch_add(1, Ordering::SeqCst);
        self.state.sessions_opened.fetch_add(1, Ordering::SeqCst);
        self.state
            .session_seeds
            .lock()
            .push(config.bookmarks.clone());
        log::debug!(
            "memory driver: opened session against {:?} with {} seed bookmark(s)",
            config.database,
            config.bookmarks.len()
        );
        Ok(Box::new(MemorySession {
            id: uuid::Uuid::new_v4(),
            state: self.state.clone(),
            database: config.database,
            last_bookmark: None,
            closed: false,
        }))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct MemorySession {
    id: uuid::Uuid,
    state: Arc<MemoryState>,
    database: Option<String>,
    last_bookmark: Option<Bookmark>,
    closed: bool,
}

#[async_trait]
impl QueryRunner for MemorySession {
    async fn run(&mut self, statement: Statement) -> DriverResult<Box<dyn RecordCursor>> {
        if self.closed {
            return Err(DriverError::SessionClosed);
        }
        self.state.record_statement(ExecutedStatement {
            statement,
            database: self.database.clone(),
            in_transaction: false,
        });
        let scripted = self.state.next_result()?;
        Ok(Box::new(MemoryCursor::new(scripted)))
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn begin_transaction(&mut self) -> DriverResult<Box<dyn Transaction>> {
        if self.closed {
            return Err(DriverError::SessionClosed);
        }
        Ok(Box::new(MemoryTransaction {
            state: self.state.clone(),
            database: self.database.clone(),
            open: true,
        }))
    }

    fn last_bookmark(&self) -> Option<Bookmark> {
        self.last_bookmark.clone()
    }

    async fn close(&mut self) -> DriverResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.state.open_sessions.fetch_sub(1, Ordering::SeqCst);
        let seq = self.state.bookmark_seq.fetch_add(1, Ordering::SeqCst);
        self.last_bookmark = Some(Bookmark::new(format!("memory:bookmark:{}", seq)));
        log::debug!("memory driver: closed session {}", self.id);
        Ok(())
    }
}

struct MemoryTransaction {
    state: Arc<MemoryState>,
    database: Option<String>,
    open: bool,
}

#[async_trait]
impl QueryRunner for MemoryTransaction {
    async fn run(&mut self, statement: Statement) -> DriverResult<Box<dyn RecordCursor>> {
        if !self.open {
            return Err(DriverError::TransactionClosed);
        }
        self.state.record_statement(ExecutedStatement {
            statement,
            database: self.database.clone(),
            in_transaction: true,
        });
        let scripted = self.state.next_result()?;
        Ok(Box::new(MemoryCursor::new(scripted)))
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(mut self: Box<Self>) -> DriverResult<()> {
        if !self.open {
            return Err(DriverError::TransactionClosed);
        }
        self.open = false;
        self.state
            .transaction_outcomes
            .lock()
            .push(TransactionOutcome::Committed);
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> DriverResult<()> {
        if !self.open {
            return Err(DriverError::TransactionClosed);
        }
        self.open = false;
        self.state
            .transaction_outcomes
            .lock()
            .push(TransactionOutcome::RolledBack);
        Ok(())
    }
}

struct MemoryCursor {
    records: VecDeque<Record>,
    summary: ResultSummary,
    streamed: u64,
}

impl MemoryCursor {
    fn new(scripted: ScriptedResult) -> Self {
        Self {
            records: scripted.records.into(),
            summary: scripted.summary,
            streamed: 0,
        }
    }
}

#[async_trait]
impl RecordCursor for MemoryCursor {
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
        let mut summary = self.summary.clone();
        summary.records_streamed = self.streamed;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[tokio::test]
    async fn test_scripted_results_are_fifo() {
        let driver = MemoryDriver::new();
        driver.enqueue_records(vec![Record::single("n", 1i64)]);
        driver.enqueue_records(vec![Record::single("n", 2i64)]);

        let mut session = driver.session(SessionConfig::default()).unwrap();
        let mut cursor = session.run(Statement::new("RETURN 1")).await.unwrap();
        let record = cursor.next().await.unwrap().unwrap();
        assert_eq!(record.get("n"), Some(&Value::Integer(1)));

        let mut cursor = session.run(Statement::new("RETURN 2")).await.unwrap();
        let record = cursor.next().await.unwrap().unwrap();
        assert_eq!(record.get("n"), Some(&Value::Integer(2)));

        // Queue exhausted: empty result, not an error.
        let mut cursor = session.run(Statement::new("RETURN 3")).await.unwrap();
        assert!(cursor.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_close_produces_bookmark_and_decrements() {
        let driver = MemoryDriver::new();
        let mut session = driver.session(SessionConfig::default()).unwrap();
        assert_eq!(driver.open_session_count(), 1);
        assert!(session.last_bookmark().is_none());

        session.close().await.unwrap();
        assert_eq!(driver.open_session_count(), 0);
        assert!(session.last_bookmark().is_some());
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let driver = MemoryDriver::new();
        driver.fail_next(DriverError::server("Neo.ClientError.Statement.SyntaxError", "bad"));

        let mut session = driver.session(SessionConfig::default()).unwrap();
        let err = session.run(Statement::new("RETURN")).await.err().unwrap();
        assert!(matches!(err, DriverError::Server { .. }));
    }

    #[tokio::test]
    async fn test_summary_counts_streamed_records() {
        let driver = MemoryDriver::new();
        driver.enqueue_records(vec![
            Record::single("n", 1i64),
            Record::single("n", 2i64),
        ]);

        let mut session = driver.session(SessionConfig::default()).unwrap();
        let mut cursor = session.run(Statement::new("RETURN n")).await.unwrap();
        cursor.next().await.unwrap();
        let summary = cursor.consume().await.unwrap();
        // Only one record was streamed before consume discarded the rest.
        assert_eq!(summary.records_streamed, 1);
    }
}
