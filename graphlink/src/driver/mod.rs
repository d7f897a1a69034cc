// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Driver seam: traits, shared types and bindings
//!
//! The client layer executes everything through the traits defined here.
//! Two bindings are provided:
//!
//! - `memory`: an in-process reference driver with deterministic bookmarks
//!   and scriptable results (used by tests and the CLI demo mode)
//! - `bolt`: a binding over the `neo4rs` driver crate (feature `bolt`,
//!   enabled by default)

#[cfg(feature = "bolt")]
pub mod bolt;
pub mod factory;
pub mod memory;
pub mod traits;
pub mod types;

pub use factory::open_driver;
pub use memory::{MemoryDriver, ScriptedResult};
pub use traits::{GraphDriver, QueryRunner, RecordCursor, Session, Transaction};
pub use types::{
    DriverError, DriverResult, Notification, NotificationSeverity, Record, ResultSummary,
    SessionConfig, Statement, SummaryCounters,
};

#[cfg(feature = "bolt")]
pub use bolt::BoltDriver;
