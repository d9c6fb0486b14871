use geo::Point;
use hashbrown::HashSet;
use log::info;

use super::Subgraph;
use crate::{BoundingBox, Error, GraphStore, RoutingConfig};

/// Loads the subgraph around a request so the search never queries the store
pub struct SubgraphLoader<'a> {
    store: &'a dyn GraphStore,
    config: &'a RoutingConfig,
}

impl<'a> SubgraphLoader<'a> {
    pub fn new(store: &'a dyn GraphStore, config: &'a RoutingConfig) -> Self {
        Self { store, config }
    }

    /// Loads the padded box around `points`, widening it once when the
    /// region turns out sparse
    pub fn load(&self, points: &[Point<f64>]) -> Result<Subgraph, Error> {
        let extent = BoundingBox::from_points(points.iter().copied()).ok_or_else(|| {
            Error::InvalidInput("cannot load a subgraph around zero points".to_string())
        })?;

        let subgraph = self.load_bounding_box(&extent.padded(self.config.bbox_padding_deg))?;
        if subgraph.node_count() >= self.config.sparse_node_threshold
            || self.config.sparse_padding_deg <= self.config.bbox_padding_deg
        {
            return Ok(subgraph);
        }

        info!(
            "Sparse region ({} nodes within {}°), widening to {}°",
            subgraph.node_count(),
            self.config.bbox_padding_deg,
            self.config.sparse_padding_deg
        );
        self.load_bounding_box(&extent.padded(self.config.sparse_padding_deg))
    }

    /// All edges inside `bbox` plus every node inside it or referenced by
    /// those edges
    pub fn load_bounding_box(&self, bbox: &BoundingBox) -> Result<Subgraph, Error> {
        let edges = self.store.find_edges_in_bounding_box(bbox)?;
        let mut nodes = self.store.find_nodes_in_bounding_box(bbox)?;

        let known: HashSet<_> = nodes.iter().map(|n| n.id).collect();
        let mut missing: Vec<_> = edges
            .iter()
            .flat_map(|e| [e.source, e.target])
            .filter(|id| !known.contains(id))
            .collect();
        missing.sort_unstable();
        missing.dedup();

        if !missing.is_empty() {
            nodes.extend(self.store.find_nodes(&missing)?);
        }

        let subgraph = Subgraph::build(nodes, edges);
        info!(
            "Loaded subgraph with {} nodes and {} edges",
            subgraph.node_count(),
            subgraph.edge_count()
        );
        Ok(subgraph)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::test_utils::{grid_store, line_store};
    use crate::{Edge, InMemoryGraphStore, Node, NodeId};

    struct CountingStore {
        inner: InMemoryGraphStore,
        single: AtomicUsize,
        batched: AtomicUsize,
    }

    impl GraphStore for CountingStore {
        fn find_node(&self, id: NodeId) -> Result<Option<Node>, Error> {
            self.single.fetch_add(1, Ordering::Relaxed);
            self.inner.find_node(id)
        }
        fn find_nodes(&self, ids: &[NodeId]) -> Result<Vec<Node>, Error> {
            self.batched.fetch_add(1, Ordering::Relaxed);
            self.inner.find_nodes(ids)
        }
        fn find_nodes_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Node>, Error> {
            self.inner.find_nodes_in_bounding_box(bbox)
        }
        fn find_nearest_node(&self, lat: f64, lon: f64) -> Result<Option<Node>, Error> {
            self.inner.find_nearest_node(lat, lon)
        }
        fn find_edges_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Edge>, Error> {
            self.inner.find_edges_in_bounding_box(bbox)
        }
        fn find_neighbor_edges(&self, node_id: NodeId) -> Result<Vec<Edge>, Error> {
            self.inner.find_neighbor_edges(node_id)
        }
        fn find_edge_between(&self, from: NodeId, to: NodeId) -> Result<Option<Edge>, Error> {
            self.inner.find_edge_between(from, to)
        }
    }

    #[test]
    fn boundary_edges_pull_in_outside_nodes() {
        let store = line_store();
        let config = RoutingConfig::default();
        let loader = SubgraphLoader::new(&store, &config);

        // only node 2 lies inside, both of its edges reach outside
        let subgraph = loader
            .load_bounding_box(&BoundingBox::new(-0.1, 0.9, 0.1, 1.1))
            .unwrap();
        assert_eq!(subgraph.edge_count(), 2);
        assert!(subgraph.contains_node(1));
        assert!(subgraph.contains_node(3));
        assert!(!subgraph.contains_node(4));
    }

    #[test]
    fn outside_nodes_are_fetched_in_one_batch() {
        let store = CountingStore {
            inner: line_store(),
            single: AtomicUsize::new(0),
            batched: AtomicUsize::new(0),
        };
        let config = RoutingConfig::default();

        let subgraph = SubgraphLoader::new(&store, &config)
            .load_bounding_box(&BoundingBox::new(-0.1, 0.9, 0.1, 1.1))
            .unwrap();
        assert!(subgraph.contains_node(1));
        assert!(subgraph.contains_node(3));
        assert_eq!(store.single.load(Ordering::Relaxed), 0);
        assert_eq!(store.batched.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn sparse_regions_are_widened() {
        let store = grid_store(10, 0.1);
        let config = RoutingConfig {
            bbox_padding_deg: 0.0,
            sparse_padding_deg: 2.0,
            sparse_node_threshold: 10,
            ..RoutingConfig::default()
        };
        let loader = SubgraphLoader::new(&store, &config);

        let subgraph = loader.load(&[Point::new(0.0, 0.0)]).unwrap();
        assert_eq!(subgraph.node_count(), 100);
    }

    #[test]
    fn dense_regions_keep_the_first_box() {
        let store = grid_store(10, 0.1);
        let config = RoutingConfig {
            bbox_padding_deg: 0.15,
            sparse_padding_deg: 2.0,
            sparse_node_threshold: 4,
            ..RoutingConfig::default()
        };
        let loader = SubgraphLoader::new(&store, &config);

        let subgraph = loader.load(&[Point::new(0.0, 0.0)]).unwrap();
        // nodes at 0.0 and 0.1 in each axis, plus neighbors pulled in by edges
        assert!(subgraph.node_count() < 100);
        assert!(subgraph.contains_node(1));
        assert!(subgraph.contains_node(12));
    }

    #[test]
    fn empty_point_list_is_rejected() {
        let store = line_store();
        let config = RoutingConfig::default();
        assert!(matches!(
            SubgraphLoader::new(&store, &config).load(&[]),
            Err(Error::InvalidInput(_))
        ));
    }
}
