// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Fluent statement execution
//!
//! [`RunnableSpec`] accumulates the Cypher text, the target database and the
//! named parameters; a fetch spec adds the mapping function and the fetch
//! cardinality. Every terminal operation performs the full
//! acquire → execute → release cycle, translating driver failures and
//! updating bookmarks on release.

use super::mapping::{ClosureMapper, RecordMapper, SingleValueMapper, ValueMapMapper};
use super::params::NamedParameters;
use super::runner::DelegatingQueryRunner;
use super::summaries;
use super::GraphClient;
use crate::driver::types::{Record, ResultSummary, Statement};
use crate::error::{translate_driver_error, GraphError, Result};
use crate::value::Value;
use async_stream::try_stream;
use futures::future::BoxFuture;
use futures::Stream;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

/// The Cypher text of a statement: fixed up front, or supplied on demand at
/// execution time.
#[derive(Clone)]
pub enum CypherSource {
    Fixed(String),
    Supplied(Arc<dyn Fn() -> String + Send + Sync>),
}

impl CypherSource {
    pub fn fixed<S: Into<String>>(cypher: S) -> Self {
        Self::Fixed(cypher.into())
    }

    pub fn supplied<F: Fn() -> String + Send + Sync + 'static>(supplier: F) -> Self {
        Self::Supplied(Arc::new(supplier))
    }

    fn materialize(&self) -> String {
        match self {
            Self::Fixed(cypher) => cypher.clone(),
            Self::Supplied(supplier) => supplier(),
        }
    }
}

/// A statement under construction: bind parameters, pick a target database,
/// then choose a fetch cardinality or run for the summary.
pub struct RunnableSpec {
    client: GraphClient,
    cypher: CypherSource,
    database: Option<String>,
    parameters: NamedParameters,
    deferred_error: Option<GraphError>,
}

impl RunnableSpec {
    pub(crate) fn new(client: GraphClient, cypher: CypherSource) -> Self {
        Self {
            client,
            cypher,
            database: None,
            parameters: NamedParameters::new(),
            deferred_error: None,
        }
    }

    /// Target a database by name instead of the resolved default.
    pub fn in_database<S: Into<String>>(mut self, database: S) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Bind one named parameter.
    ///
    /// Binding the same name twice is an error, reported when the statement
    /// executes so the fluent chain stays infallible.
    pub fn bind<S: Into<String>, V: Into<Value>>(mut self, name: S, value: V) -> Self {
        if self.deferred_error.is_none() {
            if let Err(e) = self.parameters.add(name, value) {
                self.deferred_error = Some(e);
            }
        }
        self
    }

    /// Bind all entries of the given map.
    pub fn bind_all(mut self, parameters: HashMap<String, Value>) -> Self {
        if self.deferred_error.is_none() {
            if let Err(e) = self.parameters.add_all(parameters) {
                self.deferred_error = Some(e);
            }
        }
        self
    }

    /// Fetch records as column → value maps.
    pub fn fetch(self) -> FetchSpec<HashMap<String, Value>> {
        self.with_mapper(Arc::new(ValueMapMapper))
    }

    /// Fetch the sole column of each record as `T` through the serde
    /// bridge. Records with a null value are dropped.
    pub fn fetch_as<T>(self) -> FetchSpec<T>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.with_mapper(Arc::new(SingleValueMapper::<T>::new()))
    }

    /// Fetch records through a custom mapping closure.
    pub fn mapped_by<T, F>(self, mapper: F) -> FetchSpec<T>
    where
        T: Send + 'static,
        F: Fn(&Record) -> Result<T> + Send + Sync + 'static,
    {
        self.with_mapper(Arc::new(ClosureMapper::new(mapper)))
    }

    /// Execute for effect only and return the processed result summary.
    pub async fn run(self) -> Result<ResultSummary> {
        if let Some(err) = self.deferred_error {
            return Err(err);
        }
        let database = self.client.resolve_database(self.database.as_deref()).await?;
        let statement = prepare_statement(&self.cypher, self.parameters);
        let mut runner = self.client.acquire_runner(&database).await?;
        let result = run_for_summary(&mut runner, statement).await;
        finish(runner, result).await
    }

    pub(crate) fn with_mapper<T>(self, mapper: Arc<dyn RecordMapper<T>>) -> FetchSpec<T> {
        FetchSpec {
            client: self.client,
            cypher: self.cypher,
            database: self.database,
            parameters: self.parameters,
            deferred_error: self.deferred_error,
            mapper,
        }
    }
}

enum FetchMode {
    One,
    First,
    All,
}

/// A statement with its mapping function attached; terminal operations pick
/// the fetch cardinality.
pub struct FetchSpec<T> {
    client: GraphClient,
    cypher: CypherSource,
    database: Option<String>,
    parameters: NamedParameters,
    deferred_error: Option<GraphError>,
    mapper: Arc<dyn RecordMapper<T>>,
}

impl<T: Send + 'static> FetchSpec<T> {
    /// Exactly one result or none; fails when the query yields more.
    pub async fn one(self) -> Result<Option<T>> {
        let mut results = self.execute(FetchMode::One).await?;
        Ok(results.pop())
    }

    /// The first result, if any.
    pub async fn first(self) -> Result<Option<T>> {
        let mut results = self.execute(FetchMode::First).await?;
        Ok(results.pop())
    }

    /// All results.
    pub async fn all(self) -> Result<Vec<T>> {
        self.execute(FetchMode::All).await
    }

    /// All results as an async stream.
    ///
    /// The runner is released when the stream completes; a stream dropped
    /// mid-flight releases its session through the runner's drop backstop.
    pub fn stream(mut self) -> Pin<Box<dyn Stream<Item = Result<T>> + Send>> {
        Box::pin(try_stream! {
            if let Some(err) = self.deferred_error.take() {
                Err::<(), GraphError>(err)?;
            }
            let database = self.client.resolve_database(self.database.as_deref()).await?;
            let statement = prepare_statement(&self.cypher, self.parameters);
            let mut runner = self.client.acquire_runner(&database).await?;
            let mut cursor = runner.run(statement).await.map_err(translate_driver_error)?;
            while let Some(record) = cursor.next().await.map_err(translate_driver_error)? {
                if let Some(mapped) = self.mapper.map(&record)? {
                    yield mapped;
                }
            }
            let summary = cursor.consume().await.map_err(translate_driver_error)?;
            summaries::process(summary);
            runner.release().await.map_err(translate_driver_error)?;
        })
    }

    async fn execute(self, mode: FetchMode) -> Result<Vec<T>> {
        if let Some(err) = self.deferred_error {
            return Err(err);
        }
        let database = self.client.resolve_database(self.database.as_deref()).await?;
        let statement = prepare_statement(&self.cypher, self.parameters);
        let mut runner = self.client.acquire_runner(&database).await?;
        let result = fetch_records(&mut runner, statement, &*self.mapper, mode).await;
        finish(runner, result).await
    }
}

/// Materialize the Cypher text and parameter map, logging both before
/// execution.
fn prepare_statement(cypher: &CypherSource, parameters: NamedParameters) -> Statement {
    let text = cypher.materialize();
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("Executing:\n{}", text);
        if log::log_enabled!(log::Level::Trace) && !parameters.is_empty() {
            log::trace!("with parameters:\n{}", parameters);
        }
    }
    Statement::with_parameters(text, parameters.into_map())
}

/// Release the runner and combine its outcome with the execution result.
/// Release happens on success and on failure; a release failure after a
/// failed execution is logged rather than masking the original error.
async fn finish<R>(runner: DelegatingQueryRunner, result: Result<R>) -> Result<R> {
    let released = runner.release().await;
    match result {
        Ok(value) => {
            released.map_err(translate_driver_error)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(release_err) = released {
                log::warn!("failed to release query runner: {}", release_err);
            }
            Err(err)
        }
    }
}

async fn fetch_records<T>(
    runner: &mut DelegatingQueryRunner,
    statement: Statement,
    mapper: &dyn RecordMapper<T>,
    mode: FetchMode,
) -> Result<Vec<T>> {
    let mut cursor = runner.run(statement).await.map_err(translate_driver_error)?;
    let mut results = Vec::new();
    loop {
        let record = match cursor.next().await.map_err(translate_driver_error)? {
            Some(record) => record,
            None => break,
        };
        let Some(mapped) = mapper.map(&record)? else {
            continue;
        };
        match mode {
            FetchMode::One => {
                if !results.is_empty() {
                    return Err(GraphError::IncorrectResultSize {
                        expected: 1,
                        actual: 2,
                    });
                }
                results.push(mapped);
            }
            FetchMode::First => {
                results.push(mapped);
                break;
            }
            FetchMode::All => results.push(mapped),
        }
    }
    let summary = cursor.consume().await.map_err(translate_driver_error)?;
    summaries::process(summary);
    Ok(results)
}

async fn run_for_summary(
    runner: &mut DelegatingQueryRunner,
    statement: Statement,
) -> Result<ResultSummary> {
    let mut cursor = runner.run(statement).await.map_err(translate_driver_error)?;
    while cursor.next().await.map_err(translate_driver_error)?.is_some() {}
    let summary = cursor.consume().await.map_err(translate_driver_error)?;
    Ok(summaries::process(summary))
}

type DelegationCallback<T> =
    Box<dyn for<'r> FnOnce(&'r mut DelegatingQueryRunner) -> BoxFuture<'r, Result<T>> + Send>;

/// An arbitrary operation delegated to the underlying runner, with the same
/// acquisition, release and bookmark rules as a fluent statement.
pub struct Delegation<T> {
    client: GraphClient,
    database: Option<String>,
    callback: DelegationCallback<T>,
}

impl<T: Send + 'static> Delegation<T> {
    pub(crate) fn new(client: GraphClient, callback: DelegationCallback<T>) -> Self {
        Self {
            client,
            database: None,
            callback,
        }
    }

    /// Target a database by name instead of the resolved default.
    pub fn in_database<S: Into<String>>(mut self, database: S) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Acquire a runner, hand it to the callback, release it.
    pub async fn run(self) -> Result<T> {
        let database = self.client.resolve_database(self.database.as_deref()).await?;
        let mut runner = self.client.acquire_runner(&database).await?;
        let result = (self.callback)(&mut runner).await;
        finish(runner, result).await
    }
}
