//! Route results handed back to callers

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

use super::{Coordinate, Edge, Node, Waypoint};
use crate::{EdgeId, Error, NodeId, Seconds};

/// Result of a single route computation
///
/// `found = false` results carry an `error_message` instead of a path; lookup
/// failures are reported this way rather than as errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub found: bool,
    pub start_node: Option<NodeId>,
    pub end_node: Option<NodeId>,
    pub nodes: Vec<Node>,
    /// Segments in travel order, `edges[i]` joins `nodes[i]` and `nodes[i + 1]`
    pub edges: Vec<Edge>,
    pub total_distance_km: f64,
    pub total_time_seconds: Seconds,
    pub nodes_explored: usize,
    pub computation_time_ms: f64,
    /// Served from the route cache without searching
    pub from_cache: bool,
    pub error_message: Option<String>,
}

impl RouteResult {
    pub fn from_path(nodes: Vec<Node>, edges: Vec<Edge>, nodes_explored: usize) -> Self {
        let total_distance_km = edges.iter().map(|e| e.distance_m).sum::<f64>() / 1000.0;
        let total_time_seconds = edges.iter().map(Edge::travel_time).sum();

        Self {
            found: true,
            start_node: nodes.first().map(|n| n.id),
            end_node: nodes.last().map(|n| n.id),
            nodes,
            edges,
            total_distance_km,
            total_time_seconds,
            nodes_explored,
            computation_time_ms: 0.0,
            from_cache: false,
            error_message: None,
        }
    }

    pub fn not_found(message: impl Into<String>, nodes_explored: usize) -> Self {
        Self {
            found: false,
            start_node: None,
            end_node: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            total_distance_km: 0.0,
            total_time_seconds: 0,
            nodes_explored,
            computation_time_ms: 0.0,
            from_cache: false,
            error_message: Some(message.into()),
        }
    }

    pub fn from_error(error: &Error, nodes_explored: usize) -> Self {
        Self::not_found(error.to_string(), nodes_explored)
    }

    #[must_use]
    pub fn with_endpoints(mut self, start: Option<NodeId>, end: Option<NodeId>) -> Self {
        self.start_node = start;
        self.end_node = end;
        self
    }

    #[must_use]
    pub fn with_computation_time(mut self, elapsed: std::time::Duration) -> Self {
        self.computation_time_ms = elapsed.as_secs_f64() * 1000.0;
        self
    }

    /// A usable route: found, with at least one segment between two nodes
    pub fn is_valid(&self) -> bool {
        self.found && self.nodes.len() >= 2 && !self.edges.is_empty()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.iter().map(|e| e.id).collect()
    }

    pub fn geometry(&self) -> LineString<f64> {
        self.nodes
            .iter()
            .map(|n| Coord { x: n.lon, y: n.lat })
            .collect()
    }
}

/// Both routes for one request; each carries its own `found` flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiRouteResult {
    pub optimal: RouteResult,
    pub custom: RouteResult,
}

/// A routing request, optionally owned by a trip whose cached routes can be
/// invalidated together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub owner: Option<String>,
}

impl RouteRequest {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start,
            end,
            waypoints: Vec::new(),
            owner: None,
        }
    }

    #[must_use]
    pub fn with_waypoints(mut self, waypoints: Vec<Waypoint>) -> Self {
        self.waypoints = waypoints;
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Checks every coordinate of the request
    pub fn validate(&self) -> Result<(), Error> {
        self.start.validate()?;
        self.end.validate()?;
        for waypoint in &self.waypoints {
            waypoint.coordinate().validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_come_from_edges() {
        let nodes = vec![Node::new(1, 0.0, 0.0), Node::new(2, 0.0, 0.01), Node::new(3, 0.0, 0.02)];
        let edges = vec![
            Edge::new(10, 1, 2, 1500.0).with_travel_time(60),
            Edge::new(11, 2, 3, 500.0).with_travel_time(45),
        ];
        let route = RouteResult::from_path(nodes, edges, 3);

        assert!(route.is_valid());
        assert_eq!(route.start_node, Some(1));
        assert_eq!(route.end_node, Some(3));
        assert!((route.total_distance_km - 2.0).abs() < 1e-9);
        assert_eq!(route.total_time_seconds, 105);
        assert_eq!(route.node_ids(), vec![1, 2, 3]);
        assert_eq!(route.edge_ids(), vec![10, 11]);
        assert_eq!(route.geometry().0.len(), 3);
    }

    #[test]
    fn single_node_route_is_found_but_not_valid() {
        let route = RouteResult::from_path(vec![Node::new(1, 0.0, 0.0)], Vec::new(), 1);
        assert!(route.found);
        assert!(!route.is_valid());
        assert_eq!(route.total_time_seconds, 0);
    }

    #[test]
    fn not_found_carries_message() {
        let route = RouteResult::from_error(&Error::PathNotFound { from: 1, to: 2 }, 4);
        assert!(!route.found);
        assert_eq!(route.nodes_explored, 4);
        assert!(route.error_message.unwrap().contains("No path found"));
    }

    #[test]
    fn request_validation_covers_waypoints() {
        let start = Coordinate::new(0.0, 0.0).unwrap();
        let request = RouteRequest::new(start, start)
            .with_waypoints(vec![Waypoint::Coordinate(Coordinate { lat: 120.0, lon: 0.0 })]);
        assert!(matches!(request.validate(), Err(Error::InvalidInput(_))));
    }
}
