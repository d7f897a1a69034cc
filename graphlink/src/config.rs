// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Client configuration

use crate::error::{GraphError, Result};

/// Default fetch size for result streaming.
pub const DEFAULT_FETCH_SIZE: usize = 500;

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 16;

/// Configuration for connecting a client to a graph database.
///
/// The URI scheme selects the driver binding: `memory://` for the in-process
/// reference driver, `bolt://`, `bolt+s://`, `neo4j://` or `neo4j+s://` for
/// the Bolt binding.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    /// Default target database, `None` for the server default.
    pub database: Option<String>,
    pub fetch_size: usize,
    pub max_connections: usize,
}

impl ClientConfig {
    /// Start building a configuration for the given URI.
    pub fn builder<S: Into<String>>(uri: S) -> ClientConfigBuilder {
        ClientConfigBuilder {
            uri: uri.into(),
            username: String::new(),
            password: String::new(),
            database: None,
            fetch_size: DEFAULT_FETCH_SIZE,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// The URI scheme, lower-cased.
    pub fn scheme(&self) -> Result<String> {
        let (scheme, _) = self
            .uri
            .split_once("://")
            .ok_or_else(|| GraphError::InvalidConfiguration(format!("invalid URI: {}", self.uri)))?;
        Ok(scheme.to_ascii_lowercase())
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    uri: String,
    username: String,
    password: String,
    database: Option<String>,
    fetch_size: usize,
    max_connections: usize,
}

impl ClientConfigBuilder {
    pub fn username<S: Into<String>>(mut self, username: S) -> Self {
        self.username = username.into();
        self
    }

    pub fn password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = password.into();
        self
    }

    pub fn database<S: Into<String>>(mut self, database: S) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn fetch_size(mut self, fetch_size: usize) -> Self {
        self.fetch_size = fetch_size;
        self
    }

    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        if !self.uri.contains("://") {
            return Err(GraphError::InvalidConfiguration(format!(
                "invalid URI: {}",
                self.uri
            )));
        }
        if self.fetch_size == 0 {
            return Err(GraphError::InvalidConfiguration(
                "fetch_size must be greater than zero".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(GraphError::InvalidConfiguration(
                "max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(ClientConfig {
            uri: self.uri,
            username: self.username,
            password: self.password,
            database: self.database,
            fetch_size: self.fetch_size,
            max_connections: self.max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder("memory://local").build().unwrap();
        assert_eq!(config.scheme().unwrap(), "memory");
        assert_eq!(config.fetch_size, DEFAULT_FETCH_SIZE);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_invalid_uri_rejected() {
        assert!(ClientConfig::builder("not-a-uri").build().is_err());
    }

    #[test]
    fn test_zero_fetch_size_rejected() {
        assert!(ClientConfig::builder("memory://local")
            .fetch_size(0)
            .build()
            .is_err());
    }
}
