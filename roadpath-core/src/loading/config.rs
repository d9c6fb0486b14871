use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::store::DEFAULT_MAX_SNAP_DISTANCE_M;

/// Location of the road graph files and store tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDataConfig {
    /// `id,lat,lon,node_type,poi_id,name`
    pub nodes_path: PathBuf,
    /// `id,source,target,distance_m,road_type,max_speed_kmh,travel_time_s,oneway,name`
    pub edges_path: PathBuf,
    /// Coordinates farther than this from every node do not snap (meters)
    #[serde(default = "default_max_snap_distance")]
    pub max_snap_distance_m: f64,
}

fn default_max_snap_distance() -> f64 {
    DEFAULT_MAX_SNAP_DISTANCE_M
}

impl GraphDataConfig {
    pub fn new(nodes_path: impl Into<PathBuf>, edges_path: impl Into<PathBuf>) -> Self {
        Self {
            nodes_path: nodes_path.into(),
            edges_path: edges_path.into(),
            max_snap_distance_m: DEFAULT_MAX_SNAP_DISTANCE_M,
        }
    }

    #[must_use]
    pub fn with_max_snap_distance(mut self, meters: f64) -> Self {
        self.max_snap_distance_m = meters;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        for path in [&self.nodes_path, &self.edges_path] {
            if !path.is_file() {
                return Err(Error::InvalidInput(format!(
                    "graph file '{}' does not exist",
                    path.display()
                )));
            }
        }
        if !(self.max_snap_distance_m.is_finite() && self.max_snap_distance_m > 0.0) {
            return Err(Error::InvalidInput(format!(
                "max_snap_distance_m must be positive, got {}",
                self.max_snap_distance_m
            )));
        }
        Ok(())
    }
}
