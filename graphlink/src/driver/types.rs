// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Shared types for the driver seam
//!
//! These types travel between the client layer and a driver binding:
//! statements going down, records and summaries coming back up.

use crate::client::bookmarks::Bookmark;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Result type for driver-level operations.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Errors raised by a driver binding.
///
/// Server failures carry the vendor status code (e.g.
/// `Neo.ClientError.Schema.ConstraintValidationFailed`) so the client layer
/// can translate them into its own taxonomy.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Server error [{code}]: {message}")]
    Server { code: String, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Session is closed")]
    SessionClosed,

    #[error("Transaction is closed")]
    TransactionClosed,
}

impl DriverError {
    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a server error with a vendor status code
    pub fn server<C: Into<String>, M: Into<String>>(code: C, message: M) -> Self {
        Self::Server {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a conversion error
    pub fn conversion<S: Into<String>>(msg: S) -> Self {
        Self::Conversion(msg.into())
    }
}

/// A materialized query: Cypher text plus its parameter map.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    pub cypher: String,
    pub parameters: HashMap<String, Value>,
}

impl Statement {
    pub fn new<S: Into<String>>(cypher: S) -> Self {
        Self {
            cypher: cypher.into(),
            parameters: HashMap::new(),
        }
    }

    pub fn with_parameters<S: Into<String>>(
        cypher: S,
        parameters: HashMap<String, Value>,
    ) -> Self {
        Self {
            cypher: cypher.into(),
            parameters,
        }
    }
}

/// One result row: column names plus one value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    /// Create a record from parallel column/value vectors.
    ///
    /// The two vectors must have the same length.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Create a single-column record.
    pub fn single<S: Into<String>, V: Into<Value>>(column: S, value: V) -> Self {
        Self {
            columns: vec![column.into()],
            values: vec![value.into()],
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Get a value by column position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// The sole value of a single-column record, if the record has exactly
    /// one column.
    pub fn single_value(&self) -> Option<&Value> {
        if self.values.len() == 1 {
            self.values.first()
        } else {
            None
        }
    }

    /// Consume the record into a column → value map.
    pub fn into_map(self) -> HashMap<String, Value> {
        self.columns.into_iter().zip(self.values).collect()
    }

    /// Copy the record into a column → value map.
    pub fn as_map(&self) -> HashMap<String, Value> {
        self.columns
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }
}

/// Update counters reported by the database after a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounters {
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub relationships_created: u64,
    pub relationships_deleted: u64,
    pub properties_set: u64,
    pub labels_added: u64,
    pub labels_removed: u64,
}

impl SummaryCounters {
    /// Whether the query changed anything.
    pub fn contains_updates(&self) -> bool {
        self.nodes_created > 0
            || self.nodes_deleted > 0
            || self.relationships_created > 0
            || self.relationships_deleted > 0
            || self.properties_set > 0
            || self.labels_added > 0
            || self.labels_removed > 0
    }
}

/// Severity of a server notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationSeverity {
    Warning,
    Information,
}

/// A notification attached to a result summary (deprecation warnings,
/// missing-index hints and the like).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: NotificationSeverity,
    pub code: String,
    pub title: String,
    pub description: String,
}

/// Summary of a completed query, consumed after the record stream ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub counters: SummaryCounters,
    pub notifications: Vec<Notification>,
    /// Number of records that were streamed to the client.
    pub records_streamed: u64,
    /// Server-reported time until results were available, if known.
    pub available_after_ms: Option<u64>,
    /// Server-reported time until results were consumed, if known.
    pub consumed_after_ms: Option<u64>,
}

/// Configuration for opening a driver session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Target database, `None` for the server default.
    pub database: Option<String>,
    /// Bookmarks the session must be causally consistent with.
    pub bookmarks: HashSet<Bookmark>,
}

impl SessionConfig {
    pub fn new(database: Option<String>, bookmarks: HashSet<Bookmark>) -> Self {
        Self {
            database,
            bookmarks,
        }
    }
}
