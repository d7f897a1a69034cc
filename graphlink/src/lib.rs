// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphLink - A reactive client and object-graph mapping layer for Bolt
//! graph databases
//!
//! GraphLink binds domain objects to a graph database without owning the
//! wire protocol: an external driver binding executes the queries, and
//! GraphLink manages everything around them.
//!
//! # Features
//!
//! - **Fluent statements**: bind parameters, target a database, pick a
//!   fetch cardinality (`one`, `first`, `all`, `stream`) or run for the
//!   result summary
//! - **Bookmark management**: causal-consistency tokens are snapshotted
//!   into every new session and swapped when the session closes
//! - **Ambient transactions**: `with_transaction` binds an explicit
//!   transaction to the current task; inner executions reuse it
//! - **Typed mapping**: serde-backed record mapping plus custom mapping
//!   closures with null-tolerant semantics
//! - **Error translation**: recognized driver failure categories are
//!   rewritten into one taxonomy, everything else passes through unchanged
//! - **Operations façade**: entity-centric save/find/delete/count on top of
//!   the client
//!
//! # Usage
//!
//! ```no_run
//! use graphlink::{ClientConfig, GraphClient};
//!
//! # async fn example() -> graphlink::Result<()> {
//! let config = ClientConfig::builder("bolt://localhost:7687")
//!     .username("neo4j")
//!     .password("secret")
//!     .build()?;
//! let client = GraphClient::connect(config).await?;
//!
//! let name: Option<String> = client
//!     .query("MATCH (p:Person {id: $id}) RETURN p.name")
//!     .bind("id", "p-1")
//!     .fetch_as::<String>()
//!     .one()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod ops;
pub mod value;

// Re-export the public API surface.
pub use client::bookmarks::{Bookmark, BookmarkManager};
pub use client::database::{
    DatabaseSelection, DatabaseSelectionProvider, DefaultDatabaseSelectionProvider,
    StaticDatabaseSelectionProvider,
};
pub use client::mapping::RecordMapper;
pub use client::params::NamedParameters;
pub use client::runner::DelegatingQueryRunner;
pub use client::spec::{Delegation, FetchSpec, RunnableSpec};
pub use client::tx::TransactionContext;
pub use client::GraphClient;
pub use config::ClientConfig;
pub use driver::types::{
    DriverError, Notification, NotificationSeverity, Record, ResultSummary, SessionConfig,
    Statement, SummaryCounters,
};
pub use driver::{GraphDriver, MemoryDriver, QueryRunner, RecordCursor, Session, Transaction};
pub use error::{translate_driver_error, GraphError, Result};
pub use ops::{ExecutableQuery, GraphEntity, GraphOperations, GraphTemplate, PreparedQuery};
pub use value::{Node, Relationship, Value};

/// GraphLink version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GraphLink crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
