// Re-export key components
pub use crate::cache::{
    CacheStore, CachedRouteEntry, Clock, InMemoryCacheStore, RouteCache, SystemClock,
};
pub use crate::config::RoutingConfig;
pub use crate::graph::{Subgraph, SubgraphLoader};
pub use crate::loading::{GraphDataConfig, load_graph_store};
pub use crate::model::{
    BoundingBox, Coordinate, Edge, MultiRouteResult, Node, RoadType, RouteRequest, RouteResult,
    Waypoint,
};
pub use crate::routing::{MultiRouteCalculator, PathFinder};
pub use crate::store::{GraphStore, InMemoryGraphStore, StoreView};

// Core identifier types
pub use crate::EdgeId;
pub use crate::NodeId;
pub use crate::PoiId;
pub use crate::Seconds;

pub use crate::Error;
