use std::fs;
use std::path::{Path, PathBuf};

use roadpath_core::{GraphDataConfig, RoutingConfig};
use serde::Deserialize;
use tracing::info;

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Contents of the TOML configuration file
///
/// ```toml
/// [graph]
/// nodes_path = "data/nodes.csv"
/// edges_path = "data/edges.csv"
///
/// [routing]
/// bbox_padding_deg = 0.3
///
/// [cache]
/// enabled = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub graph: Option<GraphDataConfig>,
    pub routing: RoutingConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config file contents (defaults without a file) with graph paths from
    /// the command line applied on top
    pub fn resolve(
        path: Option<&Path>,
        nodes: Option<PathBuf>,
        edges: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        let mut config = match path {
            Some(path) => {
                info!("Reading configuration from {}", path.display());
                Self::load(path)?
            }
            None => Self::default(),
        };

        config.graph = match (config.graph.take(), nodes, edges) {
            (Some(mut graph), nodes, edges) => {
                if let Some(nodes) = nodes {
                    graph.nodes_path = nodes;
                }
                if let Some(edges) = edges {
                    graph.edges_path = edges;
                }
                Some(graph)
            }
            (None, Some(nodes), Some(edges)) => Some(GraphDataConfig::new(nodes, edges)),
            (None, _, _) => None,
        };
        Ok(config)
    }

    pub fn graph(&self) -> Result<&GraphDataConfig, CliError> {
        self.graph.as_ref().ok_or(CliError::MissingGraph)
    }
}
