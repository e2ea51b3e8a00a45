//! Model configuration
//!
//! Every field has a default, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! vertex_capacity: 200000
//! io_buffer_size: 4194304
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Model configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Vertex slots reserved up front
    pub vertex_capacity: usize,
    /// Edge slots reserved up front
    pub edge_capacity: usize,
    /// Buffer size for raw stream reads and writes, in bytes
    pub io_buffer_size: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            vertex_capacity: 0,
            edge_capacity: 0,
            io_buffer_size: 1024 * 1024,
        }
    }
}

impl ModelConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.io_buffer_size, 1 << 20);
        assert_eq!(config.vertex_capacity, 0);
    }

    #[test]
    fn test_partial_yaml() {
        let config = ModelConfig::from_yaml_str("vertex_capacity: 500\n").unwrap();
        assert_eq!(config.vertex_capacity, 500);
        assert_eq!(config.edge_capacity, 0);
        assert_eq!(config.io_buffer_size, 1 << 20);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ModelConfig::from_yaml_str("vertex_capacity: lots").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "edge_capacity: 64").unwrap();
        writeln!(file, "io_buffer_size: 4096").unwrap();

        let config = ModelConfig::load(file.path()).unwrap();
        assert_eq!(config.edge_capacity, 64);
        assert_eq!(config.io_buffer_size, 4096);

        assert!(matches!(
            ModelConfig::load(file.path().with_extension("missing")),
            Err(ConfigError::Io(_))
        ));
    }
}
