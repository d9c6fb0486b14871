use std::sync::RwLock;

use chrono::{DateTime, Utc};
use hashbrown::HashMap;

use super::CachedRouteEntry;
use crate::{Error, NodeId};

/// Persistence for cached routes
///
/// Entries are keyed by `(from, to)`; saving over an existing key replaces it.
pub trait CacheStore: Send + Sync {
    fn get_cached_route(&self, from: NodeId, to: NodeId)
    -> Result<Option<CachedRouteEntry>, Error>;

    fn save_cached_route(&self, entry: CachedRouteEntry) -> Result<(), Error>;

    /// Removes every entry tagged with `owner`, returning how many were removed
    fn invalidate_by_owner(&self, owner: &str) -> Result<usize, Error>;

    /// Removes every entry expired at `now`, returning how many were removed
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, Error>;
}

#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<(NodeId, NodeId), CachedRouteEntry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::StoreUnavailable("route cache lock poisoned".to_string())
}

impl CacheStore for InMemoryCacheStore {
    fn get_cached_route(
        &self,
        from: NodeId,
        to: NodeId,
    ) -> Result<Option<CachedRouteEntry>, Error> {
        Ok(self.entries.read().map_err(poisoned)?.get(&(from, to)).cloned())
    }

    fn save_cached_route(&self, entry: CachedRouteEntry) -> Result<(), Error> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert((entry.from, entry.to), entry);
        Ok(())
    }

    fn invalidate_by_owner(&self, owner: &str) -> Result<usize, Error> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let before = entries.len();
        entries.retain(|_, entry| entry.owner.as_deref() != Some(owner));
        Ok(before - entries.len())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, Error> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }
}
