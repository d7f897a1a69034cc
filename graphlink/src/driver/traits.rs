// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Driver seam traits
//!
//! This module defines the core traits a driver binding must implement.
//! The client layer is written entirely against these traits; the wire
//! protocol, pooling and authentication all belong to the binding.

use super::types::{DriverResult, Record, ResultSummary, SessionConfig, Statement};
use crate::client::bookmarks::Bookmark;
use async_trait::async_trait;

/// A handle capable of executing a query: either a session in auto-commit
/// mode or an explicit transaction.
#[async_trait]
pub trait QueryRunner: Send {
    /// Submit a statement and return a cursor over its records.
    async fn run(&mut self, statement: Statement) -> DriverResult<Box<dyn RecordCursor>>;
}

/// A cursor over the records of one executed statement.
#[async_trait]
pub trait RecordCursor: Send {
    /// Fetch the next record, `None` once the stream is exhausted.
    async fn next(&mut self) -> DriverResult<Option<Record>>;

    /// Discard any remaining records and return the result summary.
    async fn consume(&mut self) -> DriverResult<ResultSummary>;
}

/// An explicit transaction started on a session.
#[async_trait]
pub trait Transaction: QueryRunner {
    async fn commit(self: Box<Self>) -> DriverResult<()>;

    async fn rollback(self: Box<Self>) -> DriverResult<()>;
}

/// A driver session.
///
/// Sessions are opened with a set of bookmarks to be causally consistent
/// with and produce a new bookmark when closed. Bindings that cannot surface
/// bookmarks return `None` from [`Session::last_bookmark`].
#[async_trait]
pub trait Session: QueryRunner {
    /// Begin an explicit transaction on this session.
    async fn begin_transaction(&mut self) -> DriverResult<Box<dyn Transaction>>;

    /// The bookmark produced by the last completed unit of work, if the
    /// binding surfaces bookmarks. Only meaningful after [`Session::close`].
    fn last_bookmark(&self) -> Option<Bookmark>;

    /// Close the session, releasing its connection.
    async fn close(&mut self) -> DriverResult<()>;
}

/// Entry point of a driver binding.
pub trait GraphDriver: Send + Sync {
    /// Open a session against the configured server or store.
    ///
    /// Not async itself; connection establishment is deferred to the first
    /// statement where the binding pools connections.
    fn session(&self, config: SessionConfig) -> DriverResult<Box<dyn Session>>;

    /// Short name of the binding, for logs ("memory", "bolt").
    fn name(&self) -> &'static str;
}
