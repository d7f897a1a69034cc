// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! The reactive client
//!
//! [`GraphClient`] is the entry point for executing Cypher against a graph
//! database: it resolves the target database, acquires a runner (ambient
//! transaction or a fresh bookmark-seeded session), executes statements
//! through the fluent interface, translates driver failures, and releases
//! resources with the bookmark swap on close.

pub mod bookmarks;
pub mod database;
pub mod mapping;
pub mod params;
pub mod runner;
pub mod spec;
pub mod summaries;
pub mod tx;

use crate::config::ClientConfig;
use crate::driver::factory::open_driver;
use crate::driver::traits::GraphDriver;
use crate::driver::types::SessionConfig;
use crate::error::{translate_driver_error, Result};
use bookmarks::BookmarkManager;
use database::{verify_database_name, DatabaseSelection, DatabaseSelectionProvider};
use futures::future::BoxFuture;
use runner::DelegatingQueryRunner;
use spec::{Delegation, RunnableSpec};
use std::future::Future;
use std::sync::Arc;
use tx::TransactionContext;

/// Reactive client for a graph database.
///
/// Cloning is cheap; clones share the driver, the bookmark set and the
/// database-selection provider.
///
/// # Examples
///
/// ```no_run
/// use graphlink::{ClientConfig, GraphClient};
///
/// # async fn example() -> graphlink::Result<()> {
/// let config = ClientConfig::builder("bolt://localhost:7687")
///     .username("neo4j")
///     .password("secret")
///     .build()?;
/// let client = GraphClient::connect(config).await?;
///
/// let names: Vec<String> = client
///     .query("MATCH (p:Person) WHERE p.age > $age RETURN p.name")
///     .bind("age", 21)
///     .fetch_as::<String>()
///     .all()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GraphClient {
    driver: Arc<dyn GraphDriver>,
    bookmarks: Arc<BookmarkManager>,
    selection_provider: Option<Arc<dyn DatabaseSelectionProvider>>,
}

impl GraphClient {
    /// Create a client over an already opened driver binding.
    pub fn new(driver: Arc<dyn GraphDriver>) -> Self {
        Self {
            driver,
            bookmarks: Arc::new(BookmarkManager::new()),
            selection_provider: None,
        }
    }

    /// Create a client with a pluggable database-selection strategy.
    pub fn with_database_selection_provider(
        driver: Arc<dyn GraphDriver>,
        provider: Arc<dyn DatabaseSelectionProvider>,
    ) -> Self {
        Self {
            driver,
            bookmarks: Arc::new(BookmarkManager::new()),
            selection_provider: Some(provider),
        }
    }

    /// Open the driver binding selected by the configuration and wrap it in
    /// a client. A default database in the configuration becomes a static
    /// selection provider.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let driver = open_driver(&config).await?;
        let selection_provider: Option<Arc<dyn DatabaseSelectionProvider>> =
            match &config.database {
                Some(name) => Some(Arc::new(database::StaticDatabaseSelectionProvider::new(
                    name.clone(),
                )?)),
                None => None,
            };
        Ok(Self {
            driver,
            bookmarks: Arc::new(BookmarkManager::new()),
            selection_provider,
        })
    }

    /// Start a fluent statement for the given Cypher text.
    pub fn query<S: Into<String>>(&self, cypher: S) -> RunnableSpec {
        RunnableSpec::new(self.clone(), spec::CypherSource::fixed(cypher))
    }

    /// Start a fluent statement whose Cypher text is produced on demand at
    /// execution time.
    pub fn query_with<F>(&self, supplier: F) -> RunnableSpec
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        RunnableSpec::new(self.clone(), spec::CypherSource::supplied(supplier))
    }

    /// Run an arbitrary callback against the underlying runner, with the
    /// same acquisition, release and bookmark rules as a fluent statement.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use graphlink::{GraphClient, Statement};
    /// # async fn example(client: &GraphClient) -> graphlink::Result<()> {
    /// let count = client
    ///     .delegate_to(|runner| {
    ///         Box::pin(async move {
    ///             let mut cursor = runner
    ///                 .run(Statement::new("MATCH (n) RETURN count(n)"))
    ///                 .await
    ///                 .map_err(graphlink::translate_driver_error)?;
    ///             let record = cursor.next().await.map_err(graphlink::translate_driver_error)?;
    ///             Ok(record.and_then(|r| r.single_value().and_then(|v| v.as_i64())))
    ///         })
    ///     })
    ///     .run()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn delegate_to<T, F>(&self, callback: F) -> Delegation<T>
    where
        T: Send + 'static,
        F: for<'r> FnOnce(&'r mut DelegatingQueryRunner) -> BoxFuture<'r, Result<T>>
            + Send
            + 'static,
    {
        Delegation::new(self.clone(), Box::new(callback))
    }

    /// Run `work` inside one explicit transaction.
    ///
    /// A client-owned session is opened, an explicit transaction begun and
    /// bound to the current task; every client execution inside `work` that
    /// resolves to the same database reuses that transaction. On success the
    /// transaction commits, on error it rolls back; either way the session
    /// closes through the bookmark-updating path.
    pub async fn with_transaction<T, F, Fut>(&self, database: Option<&str>, work: F) -> Result<T>
    where
        F: FnOnce(GraphClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let selection = self.resolve_database(database).await?;
        let seeds = self.bookmarks.snapshot();
        let mut session = self
            .driver
            .session(SessionConfig::new(
                selection.value().map(str::to_string),
                seeds.clone(),
            ))
            .map_err(translate_driver_error)?;
        let transaction = match session.begin_transaction().await {
            Ok(transaction) => transaction,
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    log::warn!("failed to close session after begin failed: {}", close_err);
                }
                return Err(translate_driver_error(e));
            }
        };

        // Wrap the session so the release path (and its drop backstop) is
        // the same as for any other client-owned session.
        let session_runner =
            DelegatingQueryRunner::owned(session, seeds, self.bookmarks.clone());

        let context = TransactionContext::new(selection, transaction);
        let result = tx::scope(context.clone(), work(self.clone())).await;

        let outcome = match context.take_transaction().await {
            Some(transaction) => match &result {
                Ok(_) => transaction.commit().await,
                Err(_) => transaction.rollback().await,
            },
            None => Ok(()),
        };

        let released = session_runner.release().await;

        match result {
            Ok(value) => {
                outcome.map_err(translate_driver_error)?;
                released.map_err(translate_driver_error)?;
                Ok(value)
            }
            Err(err) => {
                // The work's error wins; cleanup failures only get logged.
                if let Err(rollback_err) = outcome {
                    log::warn!("failed to roll back transaction: {}", rollback_err);
                }
                if let Err(release_err) = released {
                    log::warn!("failed to release transaction session: {}", release_err);
                }
                Err(err)
            }
        }
    }

    /// Resolve the target database from an explicit override, the selection
    /// provider, or the default, in that order.
    pub(crate) async fn resolve_database(
        &self,
        override_name: Option<&str>,
    ) -> Result<DatabaseSelection> {
        if let Some(name) = override_name {
            verify_database_name(name)?;
            return Ok(DatabaseSelection::by_name(name));
        }
        if let Some(provider) = &self.selection_provider {
            return provider.database_selection().await;
        }
        Ok(DatabaseSelection::Default)
    }

    /// Acquire the runner for one logical operation: the ambient transaction
    /// for the resolved database if one is bound to this task, otherwise a
    /// fresh session seeded with the current bookmark snapshot.
    pub(crate) async fn acquire_runner(
        &self,
        database: &DatabaseSelection,
    ) -> Result<DelegatingQueryRunner> {
        if let Some(context) = tx::current_for(database) {
            log::trace!("reusing ambient transaction for database {}", database);
            return Ok(DelegatingQueryRunner::ambient(
                context,
                self.bookmarks.clone(),
            ));
        }

        let seeds = self.bookmarks.snapshot();
        log::trace!(
            "opening session against database {} with {} bookmark(s)",
            database,
            seeds.len()
        );
        let session = self
            .driver
            .session(SessionConfig::new(
                database.value().map(str::to_string),
                seeds.clone(),
            ))
            .map_err(translate_driver_error)?;
        Ok(DelegatingQueryRunner::owned(
            session,
            seeds,
            self.bookmarks.clone(),
        ))
    }

    /// The client's bookmark set, for inspection.
    pub fn bookmarks(&self) -> &BookmarkManager {
        &self.bookmarks
    }

    /// The configured database-selection provider, if any.
    pub fn database_selection_provider(&self) -> Option<&Arc<dyn DatabaseSelectionProvider>> {
        self.selection_provider.as_ref()
    }
}
