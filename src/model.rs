use std::sync::Arc;
use std::time::Instant;

use roadpath_core::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::error::CliError;

/// Node and edge counts of the loaded graph
#[derive(Debug, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub max_snap_distance_m: f64,
}

pub fn load_store(config: &AppConfig) -> Result<InMemoryGraphStore, CliError> {
    let started = Instant::now();
    let store = load_graph_store(config.graph()?)?;
    info!(
        nodes = store.node_count(),
        edges = store.edge_count(),
        "Road graph loaded in {:.2}s",
        started.elapsed().as_secs_f64()
    );
    Ok(store)
}

/// Calculator over the configured graph, with an in-process route cache
/// unless `[cache] enabled = false`
pub fn build_calculator(config: &AppConfig) -> Result<MultiRouteCalculator, CliError> {
    let store = load_store(config)?;
    let calculator = MultiRouteCalculator::new(Arc::new(store), config.routing.clone())?;

    if config.cache.enabled {
        let cache = RouteCache::from_config(Arc::new(InMemoryCacheStore::new()), &config.routing);
        Ok(calculator.with_cache(cache))
    } else {
        Ok(calculator)
    }
}

pub fn graph_stats(config: &AppConfig) -> Result<GraphStats, CliError> {
    let store = load_store(config)?;
    Ok(GraphStats {
        nodes: store.node_count(),
        edges: store.edge_count(),
        max_snap_distance_m: store.max_snap_distance_m(),
    })
}
