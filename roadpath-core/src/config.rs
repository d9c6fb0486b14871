//! Tunables for snapping, subgraph preloading, search and caching

use serde::{Deserialize, Serialize};

use crate::{Error, RoadType};

/// Routing configuration, passed explicitly to the services that need it.
///
/// Every field has a default, so a partial TOML or JSON table deserializes
/// into a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Upper bound on any road speed, used by the A* lower bound (km/h)
    pub max_speed_kmh: f64,
    /// Margin added around the request coordinates when preloading a subgraph
    pub bbox_padding_deg: f64,
    /// Wider margin used when the first preload comes back sparse
    pub sparse_padding_deg: f64,
    /// Node count below which a preloaded subgraph counts as sparse
    pub sparse_node_threshold: usize,
    /// Lifetime of cached point-pair routes
    pub cache_ttl_hours: i64,
    /// Preload a subgraph per request instead of querying the store per node
    pub preload_subgraph: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_speed_kmh: 130.0,
            bbox_padding_deg: 0.5,
            sparse_padding_deg: 1.5,
            sparse_node_threshold: 64,
            cache_ttl_hours: 24,
            preload_subgraph: true,
        }
    }
}

impl RoutingConfig {
    /// Checks that all values are usable
    pub fn validate(&self) -> Result<(), Error> {
        let slowest = RoadType::Motorway.default_speed_kmh();
        if !(self.max_speed_kmh.is_finite() && self.max_speed_kmh >= slowest) {
            return Err(Error::InvalidInput(format!(
                "max_speed_kmh must be at least {slowest}, got {}",
                self.max_speed_kmh
            )));
        }
        if !(self.bbox_padding_deg.is_finite() && self.bbox_padding_deg >= 0.0) {
            return Err(Error::InvalidInput(format!(
                "bbox_padding_deg must not be negative, got {}",
                self.bbox_padding_deg
            )));
        }
        if !(self.sparse_padding_deg.is_finite() && self.sparse_padding_deg >= self.bbox_padding_deg)
        {
            return Err(Error::InvalidInput(format!(
                "sparse_padding_deg must be at least bbox_padding_deg ({}), got {}",
                self.bbox_padding_deg, self.sparse_padding_deg
            )));
        }
        if self.cache_ttl_hours <= 0 {
            return Err(Error::InvalidInput(format!(
                "cache_ttl_hours must be positive, got {}",
                self.cache_ttl_hours
            )));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.cache_ttl_hours)
    }
}
