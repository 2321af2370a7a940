//! # Configuration
//!
//! Server configuration is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `OPCATTR_MAX_NODES_PER_READ`, `OPCATTR_MAX_NODES_PER_WRITE`
//! 2. **Config file**: the TOML file passed to [`ServerConfig::load`], if any
//! 3. **Compiled defaults**: via `#[config(default = ...)]`
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `max_nodes_per_read` | `0` | Largest Read batch accepted; `0` means unlimited |
//! | `max_nodes_per_write` | `0` | Largest Write batch accepted; `0` means unlimited |
//!
//! A batch over its limit is rejected as a whole with `BadTooManyOperations`.

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Maximum number of items in one Read request (0 = unlimited)
    #[config(env = "OPCATTR_MAX_NODES_PER_READ", default = 0)]
    pub max_nodes_per_read: u32,

    /// Maximum number of items in one Write request (0 = unlimited)
    #[config(env = "OPCATTR_MAX_NODES_PER_WRITE", default = 0)]
    pub max_nodes_per_write: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_nodes_per_read: 0,
            max_nodes_per_write: 0,
        }
    }
}

impl ServerConfig {
    /// Load from environment, then `path` (if given and present), then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ServerConfig::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    pub fn read_limit(&self) -> Option<usize> {
        limit(self.max_nodes_per_read)
    }

    pub fn write_limit(&self) -> Option<usize> {
        limit(self.max_nodes_per_write)
    }
}

fn limit(configured: u32) -> Option<usize> {
    (configured != 0).then_some(configured as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_unlimited() {
        let config = ServerConfig::default();
        assert_eq!(config.read_limit(), None);
        assert_eq!(config.write_limit(), None);
    }

    #[test]
    fn test_limits_when_configured() {
        let config = ServerConfig {
            max_nodes_per_read: 10,
            ..Default::default()
        };
        assert_eq!(config.read_limit(), Some(10));
        assert_eq!(config.write_limit(), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opcattr.toml");
        fs::write(&path, "max_nodes_per_read = 4\nmax_nodes_per_write = 2\n").unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.read_limit(), Some(4));
        assert_eq!(config.write_limit(), Some(2));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.max_nodes_per_write, 0);
    }
}
