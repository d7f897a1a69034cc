// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Entity metadata
//!
//! [`GraphEntity`] describes how a domain type maps onto nodes: a label, an
//! id property, and serde-backed conversion between the type and a node's
//! property map. The default method implementations go through the serde
//! bridge, so most entities only declare the label.

use crate::driver::types::Record;
use crate::error::{GraphError, Result};
use crate::value::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// A domain type stored as a node.
///
/// # Examples
///
/// ```no_run
/// use graphlink::GraphEntity;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Person {
///     id: String,
///     name: String,
///     age: i64,
/// }
///
/// impl GraphEntity for Person {
///     const LABEL: &'static str = "Person";
/// }
/// ```
pub trait GraphEntity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The node label entities of this type are stored under.
    const LABEL: &'static str;

    /// The property holding the entity id.
    const ID_PROPERTY: &'static str = "id";

    /// The entity's properties as a parameter map.
    fn to_properties(&self) -> Result<HashMap<String, Value>> {
        match Value::from_json(serde_json::to_value(self)?) {
            Value::Map(properties) => Ok(properties),
            other => Err(GraphError::mapping(format!(
                "entity of type {} serialized to {} instead of a property map",
                Self::LABEL,
                other
            ))),
        }
    }

    /// The entity's id, taken from [`GraphEntity::ID_PROPERTY`].
    fn id_value(&self) -> Result<Value> {
        self.to_properties()?
            .remove(Self::ID_PROPERTY)
            .ok_or_else(|| {
                GraphError::mapping(format!(
                    "entity of type {} has no '{}' property",
                    Self::LABEL,
                    Self::ID_PROPERTY
                ))
            })
    }

    /// Rebuild the entity from a node's property map.
    fn from_properties(properties: HashMap<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Map(properties).to_json()).map_err(|e| {
            GraphError::mapping(format!(
                "cannot map node properties to {}: {}",
                Self::LABEL,
                e
            ))
        })
    }
}

/// Map a record holding one node column back to an entity.
///
/// Accepts a node, a property map, or null (dropped from the stream, like
/// any null value).
pub fn entity_from_record<E: GraphEntity>(record: &Record) -> Result<Option<E>> {
    let value = match record.single_value().or_else(|| record.get("n")) {
        Some(value) => value,
        None => {
            return Err(GraphError::mapping(format!(
                "expected a single node column for {}, got columns {:?}",
                E::LABEL,
                record.columns()
            )))
        }
    };
    match value {
        Value::Null => Ok(None),
        Value::Node(node) => E::from_properties(node.properties.clone()).map(Some),
        Value::Map(properties) => E::from_properties(properties.clone()).map(Some),
        other => Err(GraphError::mapping(format!(
            "expected a node for {}, got {}",
            E::LABEL,
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Node;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Person {
        id: String,
        name: String,
        age: i64,
    }

    impl GraphEntity for Person {
        const LABEL: &'static str = "Person";
    }

    fn alice() -> Person {
        Person {
            id: "p-1".to_string(),
            name: "Alice".to_string(),
            age: 30,
        }
    }

    #[test]
    fn test_to_properties() {
        let properties = alice().to_properties().unwrap();
        assert_eq!(properties.get("name"), Some(&Value::from("Alice")));
        assert_eq!(properties.get("age"), Some(&Value::from(30i64)));
    }

    #[test]
    fn test_id_value() {
        assert_eq!(alice().id_value().unwrap(), Value::from("p-1"));
    }

    #[test]
    fn test_round_trip_through_node() {
        let node = Node {
            id: 1,
            labels: vec![Person::LABEL.to_string()],
            properties: alice().to_properties().unwrap(),
        };
        let record = Record::single("n", Value::Node(node));
        let person: Person = entity_from_record(&record).unwrap().unwrap();
        assert_eq!(person, alice());
    }

    #[test]
    fn test_null_node_is_dropped() {
        let record = Record::single("n", Value::Null);
        assert_eq!(entity_from_record::<Person>(&record).unwrap(), None);
    }

    #[test]
    fn test_non_node_value_is_an_error() {
        let record = Record::single("n", Value::from(42i64));
        assert!(entity_from_record::<Person>(&record).is_err());
    }
}
