//! Graph store capability set and its implementations
//!
//! The road network is populated by an external process; the core only reads
//! it through [`GraphStore`]. Search loops never talk to a store directly, they
//! go through a [`NetworkView`](crate::routing::NetworkView), either a preloaded
//! [`Subgraph`](crate::Subgraph) or the slower per-node [`StoreView`].

mod memory;
mod view;

pub use memory::{DEFAULT_MAX_SNAP_DISTANCE_M, InMemoryGraphStore};
pub use view::StoreView;

use crate::{BoundingBox, Edge, Error, Node, NodeId, PoiId};

/// Read access to a populated road graph
///
/// Implementations report backend failures as [`Error::StoreUnavailable`].
pub trait GraphStore: Send + Sync {
    fn find_node(&self, id: NodeId) -> Result<Option<Node>, Error>;

    fn find_nodes_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Node>, Error>;

    /// Closest node to the coordinate within the store's search domain
    fn find_nearest_node(&self, lat: f64, lon: f64) -> Result<Option<Node>, Error>;

    /// Edges with at least one endpoint inside the box
    fn find_edges_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Edge>, Error>;

    /// Edges leaving `node_id` plus the non-one-way edges entering it
    fn find_neighbor_edges(&self, node_id: NodeId) -> Result<Vec<Edge>, Error>;

    /// Edge stored as `source_id -> target_id`
    fn find_edge_between(&self, source_id: NodeId, target_id: NodeId)
    -> Result<Option<Edge>, Error>;

    /// Nodes for every id that exists, in no particular order
    fn find_nodes(&self, ids: &[NodeId]) -> Result<Vec<Node>, Error> {
        let mut nodes = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(node) = self.find_node(id)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    /// Highest straight-line speed any edge allows (km/h), when known
    fn fastest_speed_kmh(&self) -> Option<f64> {
        None
    }

    /// Node linked to a point of interest
    fn find_node_by_poi(&self, _poi_id: PoiId) -> Result<Option<Node>, Error> {
        Ok(None)
    }
}
