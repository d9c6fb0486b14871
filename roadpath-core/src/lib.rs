//! Road-network pathfinding core.
//!
//! The crate models a road graph of intersections and road segments, runs an
//! A* search guided by a geographic lower bound, snaps raw GPS coordinates to
//! graph nodes, and chains searches through ordered waypoints. Results of
//! point-pair searches can be memoized in a time-bounded [`RouteCache`].

pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cache::{CacheStore, CachedRouteEntry, Clock, InMemoryCacheStore, RouteCache, SystemClock};
pub use config::RoutingConfig;
pub use error::Error;
pub use graph::{Subgraph, SubgraphLoader};
pub use loading::{GraphDataConfig, load_graph_store};
pub use model::{
    BoundingBox, Coordinate, Edge, MultiRouteResult, Node, RoadType, RouteRequest, RouteResult,
    Waypoint,
};
pub use routing::{MultiRouteCalculator, PathFinder, RouteAssembler};
pub use store::{GraphStore, InMemoryGraphStore, StoreView};

/// Identifier of a graph node as assigned by the ingestion pipeline
pub type NodeId = i64;
/// Identifier of a road segment as assigned by the ingestion pipeline
pub type EdgeId = i64;
/// Identifier of a point of interest linked to a node
pub type PoiId = i64;
/// Travel time in whole seconds
pub type Seconds = u32;
