// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Ambient transaction context
//!
//! An explicit transaction opened by [`GraphClient::with_transaction`] is
//! bound to the current task through a task-local. Every client execution
//! inside the scope first looks for an ambient transaction matching its
//! resolved database and reuses it instead of opening a session. The
//! transaction's lifecycle stays with `with_transaction`; ambient executions
//! never close it and never touch the bookmark set.
//!
//! [`GraphClient::with_transaction`]: crate::client::GraphClient::with_transaction

use super::database::DatabaseSelection;
use crate::driver::traits::{QueryRunner, RecordCursor, Transaction};
use crate::driver::types::{DriverError, DriverResult, Statement};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

tokio::task_local! {
    static AMBIENT_TRANSACTION: TransactionContext;
}

/// Handle to a transaction bound to the current task.
#[derive(Clone)]
pub struct TransactionContext {
    database: DatabaseSelection,
    transaction: Arc<Mutex<Option<Box<dyn Transaction>>>>,
}

impl TransactionContext {
    pub(crate) fn new(database: DatabaseSelection, transaction: Box<dyn Transaction>) -> Self {
        Self {
            database,
            transaction: Arc::new(Mutex::new(Some(transaction))),
        }
    }

    pub fn database(&self) -> &DatabaseSelection {
        &self.database
    }

    /// Run a statement on the ambient transaction.
    pub(crate) async fn run(&self, statement: Statement) -> DriverResult<Box<dyn RecordCursor>> {
        let mut guard = self.transaction.lock().await;
        let transaction = guard.as_mut().ok_or(DriverError::TransactionClosed)?;
        transaction.run(statement).await
    }

    /// Take the transaction out of the context to finish it. Later ambient
    /// executions on a stale clone fail with a closed-transaction error.
    pub(crate) async fn take_transaction(&self) -> Option<Box<dyn Transaction>> {
        self.transaction.lock().await.take()
    }
}

/// The ambient transaction of the current task for the given database, if
/// one is in scope.
pub(crate) fn current_for(database: &DatabaseSelection) -> Option<TransactionContext> {
    AMBIENT_TRANSACTION
        .try_with(|ctx| {
            if ctx.database() == database {
                Some(ctx.clone())
            } else {
                None
            }
        })
        .ok()
        .flatten()
}

/// Run a future with the given transaction context bound to the task.
pub(crate) async fn scope<F: Future>(context: TransactionContext, future: F) -> F::Output {
    AMBIENT_TRANSACTION.scope(context, future).await
}
