// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Named query parameters
//!
//! Bind variables accumulated across a fluent call chain and consumed once
//! at execution time. Binding the same name twice is an error, surfaced when
//! the statement executes.

use crate::error::{GraphError, Result};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;

/// Container for the named parameters of one statement.
#[derive(Debug, Clone, Default)]
pub struct NamedParameters {
    values: HashMap<String, Value>,
}

impl NamedParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single parameter. Fails on a duplicate name.
    pub fn add<S: Into<String>, V: Into<Value>>(&mut self, name: S, value: V) -> Result<()> {
        let name = name.into();
        if self.values.contains_key(&name) {
            return Err(GraphError::DuplicateParameter(name));
        }
        self.values.insert(name, value.into());
        Ok(())
    }

    /// Add all entries of the given map. Fails on the first duplicate name.
    pub fn add_all(&mut self, parameters: HashMap<String, Value>) -> Result<()> {
        for (name, value) in parameters {
            self.add(name, value)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Consume the container into the parameter map handed to the driver.
    pub fn into_map(self) -> HashMap<String, Value> {
        self.values
    }
}

impl fmt::Display for NamedParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.values.keys().collect();
        names.sort();
        let rendered: Vec<String> = names
            .into_iter()
            .map(|name| format!("{}: {}", name, self.values[name]))
            .collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_rejected() {
        let mut params = NamedParameters::new();
        params.add("name", "Alice").unwrap();
        let err = params.add("name", "Bob").unwrap_err();
        assert!(matches!(err, GraphError::DuplicateParameter(name) if name == "name"));
    }

    #[test]
    fn test_display_is_sorted() {
        let mut params = NamedParameters::new();
        params.add("b", 2i64).unwrap();
        params.add("a", 1i64).unwrap();
        assert_eq!(params.to_string(), "{a: 1, b: 2}");
    }

    #[test]
    fn test_add_all() {
        let mut params = NamedParameters::new();
        let mut map = HashMap::new();
        map.insert("x".to_string(), Value::from(1i64));
        map.insert("y".to_string(), Value::from(2i64));
        params.add_all(map).unwrap();
        assert_eq!(params.len(), 2);
    }
}
