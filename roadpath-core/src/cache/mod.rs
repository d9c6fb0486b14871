//! Time-bounded memoization of point-pair routes

mod entry;
mod route_cache;
mod store;

pub use entry::{CachedRouteEntry, EncodedPath};
pub use route_cache::{Clock, RouteCache, SystemClock};
pub use store::{CacheStore, InMemoryCacheStore};
