//! Route search: A* over a [`NetworkView`], path assembly and multi-route
//! computation through waypoints

pub mod assembler;
mod astar;
pub mod heuristic;
mod multi_route;
mod network;
mod to_geojson;

pub use assembler::{PathStep, RouteAssembler};
pub use astar::PathFinder;
pub use heuristic::{DEFAULT_MAX_SPEED_KMH, travel_time_lower_bound};
pub use multi_route::MultiRouteCalculator;
pub use network::{NetworkView, Step};
