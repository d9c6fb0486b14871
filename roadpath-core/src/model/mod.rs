//! Data model for road-network routing
//!
//! Contains the graph elements (nodes and road segments), request-side
//! locations and waypoints, and the route results handed back to callers.

pub mod components;
pub mod location;
pub mod route;
pub mod waypoint;

pub use components::{Edge, Node, RoadType};
pub use location::{BoundingBox, Coordinate};
pub use route::{MultiRouteResult, RouteRequest, RouteResult};
pub use waypoint::Waypoint;
