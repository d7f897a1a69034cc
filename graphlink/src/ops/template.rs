// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! The operations façade implementation
//!
//! [`GraphTemplate`] layers entity-centric save/find/delete/count operations
//! on the reactive client, generating Cypher from [`GraphEntity`] metadata.
//! Every operation goes through the client and therefore inherits database
//! resolution, bookmark handling and error translation.

use super::entity::{entity_from_record, GraphEntity};
use super::{ExecutableQuery, GraphOperations, PreparedQuery};
use crate::client::mapping::RecordMapper;
use crate::client::GraphClient;
use crate::driver::types::Record;
use crate::error::Result;
use crate::value::Value;
use async_trait::async_trait;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Record mapper backed by [`GraphEntity`] metadata.
struct EntityMapper<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E> EntityMapper<E> {
    fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E: GraphEntity> RecordMapper<E> for EntityMapper<E> {
    fn map(&self, record: &Record) -> Result<Option<E>> {
        entity_from_record(record)
    }
}

/// Entity operations layered on a [`GraphClient`].
#[derive(Clone)]
pub struct GraphTemplate {
    client: GraphClient,
}

impl GraphTemplate {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// The underlying client, for statements the façade does not cover.
    pub fn client(&self) -> &GraphClient {
        &self.client
    }

    /// Turn a prepared query into an executable one.
    pub fn to_executable_query<T: Send + 'static>(
        &self,
        query: PreparedQuery<T>,
    ) -> ExecutableQuery<T> {
        ExecutableQuery::new(self.client.clone(), query)
    }

    fn entity_mapper<E: GraphEntity>() -> Arc<dyn RecordMapper<E>> {
        Arc::new(EntityMapper::<E>::new())
    }
}

#[async_trait]
impl GraphOperations for GraphTemplate {
    async fn count<E: GraphEntity>(&self) -> Result<i64> {
        let cypher = format!("MATCH (n:{}) RETURN count(n)", E::LABEL);
        self.count_by(&cypher, HashMap::new()).await
    }

    async fn count_by(&self, cypher: &str, parameters: HashMap<String, Value>) -> Result<i64> {
        let count = self
            .client
            .query(cypher)
            .bind_all(parameters)
            .fetch_as::<i64>()
            .one()
            .await?;
        Ok(count.unwrap_or(0))
    }

    async fn find_all<E: GraphEntity>(&self) -> Result<Vec<E>> {
        let cypher = format!("MATCH (n:{}) RETURN n", E::LABEL);
        self.find_all_by(&cypher, HashMap::new()).await
    }

    async fn find_all_by<E: GraphEntity>(
        &self,
        cypher: &str,
        parameters: HashMap<String, Value>,
    ) -> Result<Vec<E>> {
        self.client
            .query(cypher)
            .bind_all(parameters)
            .with_mapper(Self::entity_mapper::<E>())
            .all()
            .await
    }

    async fn find_one<E: GraphEntity>(
        &self,
        cypher: &str,
        parameters: HashMap<String, Value>,
    ) -> Result<Option<E>> {
        self.client
            .query(cypher)
            .bind_all(parameters)
            .with_mapper(Self::entity_mapper::<E>())
            .one()
            .await
    }

    async fn find_by_id<E: GraphEntity>(&self, id: Value) -> Result<Option<E>> {
        let cypher = format!(
            "MATCH (n:{}) WHERE n.{} = $id RETURN n",
            E::LABEL,
            E::ID_PROPERTY
        );
        self.client
            .query(cypher)
            .bind("id", id)
            .with_mapper(Self::entity_mapper::<E>())
            .one()
            .await
    }

    async fn find_all_by_ids<E: GraphEntity>(&self, ids: Vec<Value>) -> Result<Vec<E>> {
        let cypher = format!(
            "MATCH (n:{}) WHERE n.{} IN $ids RETURN n",
            E::LABEL,
            E::ID_PROPERTY
        );
        self.client
            .query(cypher)
            .bind("ids", Value::List(ids))
            .with_mapper(Self::entity_mapper::<E>())
            .all()
            .await
    }

    async fn save<E: GraphEntity>(&self, entity: &E) -> Result<E> {
        let id = entity.id_value()?;
        let properties = entity.to_properties()?;
        let cypher = format!(
            "MERGE (n:{} {{{}: $id}}) SET n += $props RETURN n",
            E::LABEL,
            E::ID_PROPERTY
        );
        let saved = self
            .client
            .query(cypher)
            .bind("id", id)
            .bind("props", Value::Map(properties))
            .with_mapper(Self::entity_mapper::<E>())
            .one()
            .await?;
        saved.ok_or(crate::error::GraphError::NoResult)
    }

    async fn save_all<E: GraphEntity>(&self, entities: &[E]) -> Result<Vec<E>> {
        let mut saved = Vec::with_capacity(entities.len());
        for entity in entities {
            saved.push(self.save(entity).await?);
        }
        Ok(saved)
    }

    async fn delete_by_id<E: GraphEntity>(&self, id: Value) -> Result<()> {
        let cypher = format!(
            "MATCH (n:{}) WHERE n.{} = $id DETACH DELETE n",
            E::LABEL,
            E::ID_PROPERTY
        );
        self.client.query(cypher).bind("id", id).run().await?;
        Ok(())
    }

    async fn delete_all_by_ids<E: GraphEntity>(&self, ids: Vec<Value>) -> Result<()> {
        let cypher = format!(
            "MATCH (n:{}) WHERE n.{} IN $ids DETACH DELETE n",
            E::LABEL,
            E::ID_PROPERTY
        );
        self.client
            .query(cypher)
            .bind("ids", Value::List(ids))
            .run()
            .await?;
        Ok(())
    }

    async fn delete_all<E: GraphEntity>(&self) -> Result<()> {
        let cypher = format!("MATCH (n:{}) DETACH DELETE n", E::LABEL);
        self.client.query(cypher).run().await?;
        Ok(())
    }
}
