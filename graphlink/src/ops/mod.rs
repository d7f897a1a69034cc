// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Operations façade
//!
//! Entity-centric operations on top of the reactive client:
//! - [`GraphOperations`] — the save/find/delete/count contract
//! - [`GraphTemplate`] — its implementation over a [`GraphClient`]
//! - [`PreparedQuery`] / [`ExecutableQuery`] — a query carrying its own
//!   mapping function, with explicit result cardinalities
//!
//! [`GraphClient`]: crate::client::GraphClient

pub mod entity;
pub mod template;

pub use entity::GraphEntity;
pub use template::GraphTemplate;

use crate::client::mapping::{RecordMapper, SingleValueMapper, ValueMapMapper};
use crate::client::GraphClient;
use crate::error::{GraphError, Result};
use crate::value::Value;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

/// Operations one can perform on the database, based on a domain type.
#[async_trait]
pub trait GraphOperations: Send + Sync {
    /// Count the entities of the given type.
    async fn count<E: GraphEntity>(&self) -> Result<i64>;

    /// Count via a custom query returning a single count column.
    async fn count_by(&self, cypher: &str, parameters: HashMap<String, Value>) -> Result<i64>;

    /// Load all entities of the given type.
    async fn find_all<E: GraphEntity>(&self) -> Result<Vec<E>>;

    /// Load entities via a custom query returning node rows.
    async fn find_all_by<E: GraphEntity>(
        &self,
        cypher: &str,
        parameters: HashMap<String, Value>,
    ) -> Result<Vec<E>>;

    /// Load at most one entity via a custom query; fails when the query
    /// yields more than one row.
    async fn find_one<E: GraphEntity>(
        &self,
        cypher: &str,
        parameters: HashMap<String, Value>,
    ) -> Result<Option<E>>;

    /// Load an entity by id.
    async fn find_by_id<E: GraphEntity>(&self, id: Value) -> Result<Option<E>>;

    /// Load all entities with one of the given ids.
    async fn find_all_by_ids<E: GraphEntity>(&self, ids: Vec<Value>) -> Result<Vec<E>>;

    /// Save an entity (merge on its id property) and return the saved state.
    async fn save<E: GraphEntity>(&self, entity: &E) -> Result<E>;

    /// Save several entities and return their saved states.
    async fn save_all<E: GraphEntity>(&self, entities: &[E]) -> Result<Vec<E>>;

    /// Delete an entity by id, including its relationships.
    async fn delete_by_id<E: GraphEntity>(&self, id: Value) -> Result<()>;

    /// Delete all entities with one of the given ids.
    async fn delete_all_by_ids<E: GraphEntity>(&self, ids: Vec<Value>) -> Result<()>;

    /// Delete all entities of the given type.
    async fn delete_all<E: GraphEntity>(&self) -> Result<()>;
}

/// A query carrying its parameters and mapping function, ready to be turned
/// into an [`ExecutableQuery`].
pub struct PreparedQuery<T> {
    cypher: String,
    parameters: HashMap<String, Value>,
    mapper: Arc<dyn RecordMapper<T>>,
}

impl PreparedQuery<HashMap<String, Value>> {
    /// Prepare a query mapping records to column → value maps.
    pub fn new<S: Into<String>>(cypher: S) -> Self {
        Self {
            cypher: cypher.into(),
            parameters: HashMap::new(),
            mapper: Arc::new(ValueMapMapper),
        }
    }
}

impl<T> PreparedQuery<T> {
    /// Prepare a query mapping the sole column of each record to `T`.
    pub fn fetching_as<S: Into<String>>(cypher: S) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Self {
            cypher: cypher.into(),
            parameters: HashMap::new(),
            mapper: Arc::new(SingleValueMapper::<T>::new()),
        }
    }

    /// Prepare a query with a custom mapping function.
    pub fn with_mapper<S: Into<String>>(cypher: S, mapper: Arc<dyn RecordMapper<T>>) -> Self {
        Self {
            cypher: cypher.into(),
            parameters: HashMap::new(),
            mapper,
        }
    }

    /// Replace the parameter map.
    pub fn with_parameters(mut self, parameters: HashMap<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn cypher(&self) -> &str {
        &self.cypher
    }
}

/// A query bound to a client, exposing explicit result cardinalities.
pub struct ExecutableQuery<T> {
    client: GraphClient,
    query: PreparedQuery<T>,
}

impl<T: Send + 'static> ExecutableQuery<T> {
    pub(crate) fn new(client: GraphClient, query: PreparedQuery<T>) -> Self {
        Self { client, query }
    }

    fn fetch_spec(&self) -> crate::client::spec::FetchSpec<T> {
        self.client
            .query(self.query.cypher.clone())
            .bind_all(self.query.parameters.clone())
            .with_mapper(self.query.mapper.clone())
    }

    /// All results; possibly empty, never an error for being empty.
    pub async fn results(&self) -> Result<Vec<T>> {
        self.fetch_spec().all().await
    }

    /// An optional single result; fails when the query yields more than one.
    pub async fn single_result(&self) -> Result<Option<T>> {
        self.fetch_spec().one().await
    }

    /// A required single result; fails when the query yields none or more
    /// than one.
    pub async fn required_single_result(&self) -> Result<T> {
        self.single_result().await?.ok_or(GraphError::NoResult)
    }
}
