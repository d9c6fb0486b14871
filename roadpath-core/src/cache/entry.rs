use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{EdgeId, Error, NodeId, RouteResult, Seconds};

/// Ordered node and edge ids of a cached path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPath {
    #[serde(rename = "n")]
    pub nodes: Vec<NodeId>,
    #[serde(rename = "e")]
    pub edges: Vec<EdgeId>,
}

/// Persisted form of a computed point-pair route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRouteEntry {
    pub from: NodeId,
    pub to: NodeId,
    /// Compact JSON encoding of an [`EncodedPath`]
    pub path: String,
    pub total_distance_km: f64,
    pub total_time_seconds: Seconds,
    pub nodes_explored: usize,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Trip (or other owner) whose changes invalidate this entry
    pub owner: Option<String>,
}

impl CachedRouteEntry {
    pub fn encode(
        route: &RouteResult,
        created_at: DateTime<Utc>,
        ttl: Duration,
        owner: Option<&str>,
    ) -> Result<Self, Error> {
        let (Some(from), Some(to), true) = (route.start_node, route.end_node, route.found) else {
            return Err(Error::InvalidInput(
                "only found routes can be cached".to_string(),
            ));
        };

        let path = EncodedPath {
            nodes: route.node_ids(),
            edges: route.edge_ids(),
        };
        let path =
            serde_json::to_string(&path).map_err(|e| Error::SerializationError(e.to_string()))?;

        Ok(Self {
            from,
            to,
            path,
            total_distance_km: route.total_distance_km,
            total_time_seconds: route.total_time_seconds,
            nodes_explored: route.nodes_explored,
            created_at,
            expires_at: created_at + ttl,
            owner: owner.map(str::to_string),
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Decodes and sanity-checks the stored path
    pub fn decode_path(&self) -> Result<EncodedPath, Error> {
        let path: EncodedPath = serde_json::from_str(&self.path)
            .map_err(|e| Error::CacheDecodeError(format!("{} -> {}: {e}", self.from, self.to)))?;

        if path.nodes.first() != Some(&self.from) || path.nodes.last() != Some(&self.to) {
            return Err(Error::CacheDecodeError(format!(
                "{} -> {}: path endpoints do not match",
                self.from, self.to
            )));
        }
        if path.edges.len() + 1 != path.nodes.len() {
            return Err(Error::CacheDecodeError(format!(
                "{} -> {}: {} edges for {} nodes",
                self.from,
                self.to,
                path.edges.len(),
                path.nodes.len()
            )));
        }
        Ok(path)
    }
}
