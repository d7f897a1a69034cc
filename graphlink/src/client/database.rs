// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Target-database selection
//!
//! A [`DatabaseSelection`] is resolved once per logical operation, from an
//! explicit `.in_database(..)` override, a pluggable
//! [`DatabaseSelectionProvider`], or the default, in that order.

use crate::error::{GraphError, Result};
use async_trait::async_trait;
use std::fmt;

/// An immutable choice of target database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatabaseSelection {
    /// Use the server's default database.
    Default,
    /// Target a database by name.
    ByName(String),
}

impl DatabaseSelection {
    pub fn by_name<S: Into<String>>(name: S) -> Self {
        Self::ByName(name.into())
    }

    /// The database name, `None` for the default selection.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Default => None,
            Self::ByName(name) => Some(name),
        }
    }
}

impl fmt::Display for DatabaseSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "<default>"),
            Self::ByName(name) => write!(f, "{}", name),
        }
    }
}

/// Pluggable strategy for resolving the target database when no explicit
/// override is given (multi-tenant routing, per-request databases and the
/// like).
#[async_trait]
pub trait DatabaseSelectionProvider: Send + Sync {
    async fn database_selection(&self) -> Result<DatabaseSelection>;
}

/// Provider that always yields the default database.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDatabaseSelectionProvider;

#[async_trait]
impl DatabaseSelectionProvider for DefaultDatabaseSelectionProvider {
    async fn database_selection(&self) -> Result<DatabaseSelection> {
        Ok(DatabaseSelection::Default)
    }
}

/// Provider that always yields one fixed database.
#[derive(Debug, Clone)]
pub struct StaticDatabaseSelectionProvider {
    selection: DatabaseSelection,
}

impl StaticDatabaseSelectionProvider {
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        verify_database_name(&name)?;
        Ok(Self {
            selection: DatabaseSelection::ByName(name),
        })
    }
}

#[async_trait]
impl DatabaseSelectionProvider for StaticDatabaseSelectionProvider {
    async fn database_selection(&self) -> Result<DatabaseSelection> {
        Ok(self.selection.clone())
    }
}

/// A database name must be non-empty and free of surrounding whitespace.
pub fn verify_database_name(name: &str) -> Result<()> {
    if name.is_empty() || name.trim() != name {
        return Err(GraphError::InvalidDatabaseName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_database_name() {
        assert!(verify_database_name("people").is_ok());
        assert!(verify_database_name("").is_err());
        assert!(verify_database_name(" people").is_err());
        assert!(verify_database_name("people ").is_err());
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticDatabaseSelectionProvider::new("people").unwrap();
        assert_eq!(
            provider.database_selection().await.unwrap(),
            DatabaseSelection::by_name("people")
        );
        assert!(StaticDatabaseSelectionProvider::new("").is_err());
    }
}
