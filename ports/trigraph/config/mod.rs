/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Configuration for trigraph, stored as TOML.

use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::DEFAULT_HISTORY_DEPTH;

const CONFIG_FILE_NAME: &str = "trigraph.toml";

/// Get the config directory for trigraph
pub fn config_dir() -> PathBuf {
    if let Some(config_home) = dirs::config_dir() {
        config_home.join("trigraph")
    } else {
        PathBuf::from(".trigraph")
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Vertex sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexConfig {
    /// Radius given to newly placed vertices (default: 10)
    pub default_radius: f64,

    /// Smallest radius `set_vertex_radius` accepts (default: 5)
    pub min_radius: f64,

    /// Largest radius `set_vertex_radius` accepts (default: 30)
    pub max_radius: f64,
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            default_radius: 10.0,
            min_radius: 5.0,
            max_radius: 30.0,
        }
    }
}

impl VertexConfig {
    /// Clamp `radius` into the configured range
    pub fn clamp_radius(&self, radius: f64) -> f64 {
        if self.min_radius <= self.max_radius {
            radius.clamp(self.min_radius, self.max_radius)
        } else {
            radius
        }
    }
}

/// External solver invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Solver executable (default: triangle-solver)
    pub executable: PathBuf,

    /// Arguments passed to the solver (default: none)
    pub args: Vec<String>,

    /// Exchange file the solver reads the matrix from (default: javaOut.txt)
    pub exchange_file: PathBuf,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("triangle-solver"),
            args: Vec::new(),
            exchange_file: PathBuf::from("javaOut.txt"),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrigraphConfig {
    /// Snapshots kept on each of the undo and redo stacks (default: 100)
    pub history_depth: usize,

    /// Seed for triangle colors; random when absent
    pub color_seed: Option<u64>,

    pub vertex: VertexConfig,

    pub solver: SolverConfig,
}

impl Default for TrigraphConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            color_seed: None,
            vertex: VertexConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl TrigraphConfig {
    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}; using default configuration");
                Self::default()
            },
        }
    }

    /// Load from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save to an explicit file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string).map_err(io_error)
    }

    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        config_dir().join(CONFIG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TrigraphConfig::default();
        assert_eq!(config.history_depth, 100);
        assert_eq!(config.vertex.default_radius, 10.0);
        assert_eq!(config.vertex.min_radius, 5.0);
        assert_eq!(config.vertex.max_radius, 30.0);
        assert!(config.solver.args.is_empty());
        assert_eq!(config.solver.exchange_file, PathBuf::from("javaOut.txt"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: TrigraphConfig = toml::from_str(
            r#"
            color_seed = 42

            [solver]
            executable = "/opt/solver/bin/partition"
            "#,
        )
        .unwrap();

        assert_eq!(config.color_seed, Some(42));
        assert_eq!(config.solver.executable, PathBuf::from("/opt/solver/bin/partition"));
        assert_eq!(config.solver.exchange_file, PathBuf::from("javaOut.txt"));
        assert_eq!(config.vertex, VertexConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("trigraph.toml");

        let mut config = TrigraphConfig::default();
        config.history_depth = 12;
        config.vertex.default_radius = 15.0;
        config.solver.args = vec!["--quiet".to_string()];
        config.save_to(&path).unwrap();

        let loaded = TrigraphConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trigraph.toml");
        std::fs::write(&path, "history_depth = \"lots\"").unwrap();

        assert!(matches!(
            TrigraphConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            TrigraphConfig::load_from(&dir.path().join("absent.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_clamp_radius() {
        let vertex = VertexConfig::default();
        assert_eq!(vertex.clamp_radius(1.0), 5.0);
        assert_eq!(vertex.clamp_radius(12.5), 12.5);
        assert_eq!(vertex.clamp_radius(99.0), 30.0);
    }
}
