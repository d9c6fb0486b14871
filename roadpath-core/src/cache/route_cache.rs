use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};

use super::{CacheStore, CachedRouteEntry};
use crate::routing::assembler::PathStep;
use crate::routing::{NetworkView, PathFinder, RouteAssembler};
use crate::{Error, NodeId, RouteResult, RoutingConfig};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Memoizes point-pair search results for a fixed time
///
/// The cache is never authoritative: store failures and undecodable entries
/// are logged and treated as misses. Concurrent identical requests may both
/// compute and save; the last save wins.
#[derive(Clone)]
pub struct RouteCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl RouteCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_config(store: Arc<dyn CacheStore>, config: &RoutingConfig) -> Self {
        Self::new(store, config.cache_ttl())
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached route between two nodes, rebuilt against `view`
    ///
    /// Returns `None` on a miss, for expired entries, and for entries that no
    /// longer decode or no longer match the graph.
    pub fn lookup<V>(&self, view: &V, from: NodeId, to: NodeId) -> Option<RouteResult>
    where
        V: NetworkView + ?Sized,
    {
        let started = Instant::now();
        let entry = match self.store.get_cached_route(from, to) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!("Route cache read failed for {from} -> {to}: {e}");
                return None;
            }
        };

        if entry.is_expired(self.clock.now()) {
            debug!("Cached route {from} -> {to} expired at {}", entry.expires_at);
            return None;
        }

        match Self::rebuild(view, &entry) {
            Ok(mut route) => {
                route.from_cache = true;
                route.nodes_explored = 0;
                Some(route.with_computation_time(started.elapsed()))
            }
            Err(e) => {
                warn!("Discarding cached route {from} -> {to}: {e}");
                None
            }
        }
    }

    fn rebuild<V>(view: &V, entry: &CachedRouteEntry) -> Result<RouteResult, Error>
    where
        V: NetworkView + ?Sized,
    {
        let path = entry.decode_path()?;
        let steps: Vec<PathStep> = path
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, &node)| PathStep {
                node,
                via: idx.checked_sub(1).map(|prev| path.edges[prev]),
            })
            .collect();

        let route = RouteAssembler::assemble(view, &steps, entry.nodes_explored).map_err(|e| {
            match e {
                Error::InvalidData(reason) => Error::CacheDecodeError(reason),
                other => other,
            }
        })?;

        if route.total_time_seconds != entry.total_time_seconds {
            return Err(Error::CacheDecodeError(format!(
                "stored time {}s differs from the graph's {}s",
                entry.total_time_seconds, route.total_time_seconds
            )));
        }
        Ok(route)
    }

    /// Stores a found route; missing routes are not cached
    pub fn save(&self, route: &RouteResult, owner: Option<&str>) {
        if !route.found {
            return;
        }
        let entry = match CachedRouteEntry::encode(route, self.clock.now(), self.ttl, owner) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Could not encode route for caching: {e}");
                return;
            }
        };
        if let Err(e) = self.store.save_cached_route(entry) {
            warn!("Route cache write failed: {e}");
        }
    }

    /// Cached route if present, otherwise searches and caches the result
    ///
    /// # Errors
    ///
    /// Propagates search failures
    pub fn find_path<V>(
        &self,
        finder: &PathFinder,
        view: &V,
        from: NodeId,
        to: NodeId,
        owner: Option<&str>,
    ) -> Result<RouteResult, Error>
    where
        V: NetworkView + ?Sized,
    {
        if let Some(route) = self.lookup(view, from, to) {
            debug!("Route cache hit for {from} -> {to}");
            return Ok(route);
        }

        let route = finder.search(view, from, to)?;
        self.save(&route, owner);
        Ok(route)
    }

    /// Drops every route cached for `owner`, e.g. after a trip's waypoints change
    pub fn invalidate_owner(&self, owner: &str) -> Result<usize, Error> {
        let removed = self.store.invalidate_by_owner(owner)?;
        debug!("Invalidated {removed} cached routes owned by {owner}");
        Ok(removed)
    }

    /// Drops every expired route; meant to be called periodically
    pub fn purge_expired(&self) -> Result<usize, Error> {
        let removed = self.store.purge_expired(self.clock.now())?;
        debug!("Purged {removed} expired cached routes");
        Ok(removed)
    }
}
