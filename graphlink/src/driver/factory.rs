// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Driver factory
//!
//! Selects and opens a driver binding from a client configuration's URI
//! scheme.

use super::memory::MemoryDriver;
use super::traits::GraphDriver;
use crate::config::ClientConfig;
use crate::error::{translate_driver_error, GraphError, Result};
use std::sync::Arc;

/// Open the driver binding selected by the configuration's URI scheme.
pub async fn open_driver(config: &ClientConfig) -> Result<Arc<dyn GraphDriver>> {
    let scheme = config.scheme()?;
    match scheme.as_str() {
        "memory" => {
            log::info!("opening in-memory driver");
            Ok(Arc::new(MemoryDriver::new()))
        }
        #[cfg(feature = "bolt")]
        "bolt" | "bolt+s" | "neo4j" | "neo4j+s" => {
            let driver = super::bolt::BoltDriver::connect(config)
                .await
                .map_err(translate_driver_error)?;
            Ok(Arc::new(driver))
        }
        #[cfg(not(feature = "bolt"))]
        "bolt" | "bolt+s" | "neo4j" | "neo4j+s" => Err(GraphError::InvalidConfiguration(
            "bolt support is not compiled in (enable the `bolt` feature)".to_string(),
        )),
        other => Err(GraphError::InvalidConfiguration(format!(
            "unsupported URI scheme '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_scheme() {
        let config = ClientConfig::builder("memory://local").build().unwrap();
        let driver = open_driver(&config).await.unwrap();
        assert_eq!(driver.name(), "memory");
    }

    #[tokio::test]
    async fn test_unknown_scheme_rejected() {
        let config = ClientConfig::builder("http://localhost").build().unwrap();
        assert!(open_driver(&config).await.is_err());
    }
}
