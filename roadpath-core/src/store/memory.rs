//! In-memory graph store with R-tree spatial indices

use hashbrown::HashMap;
use log::info;
use rstar::{
    AABB, RTree,
    primitives::{GeomWithData, Rectangle},
};

use super::GraphStore;
use crate::{BoundingBox, Edge, EdgeId, Error, Node, NodeId, PoiId};

type IndexedNode = GeomWithData<[f64; 2], NodeId>;
type IndexedEdge = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Meridian length of one degree, rounded down so that it stays a lower bound
const METERS_PER_DEGREE: f64 = 111_000.0;

pub const DEFAULT_MAX_SNAP_DISTANCE_M: f64 = 5000.0;

#[derive(Debug)]
pub struct InMemoryGraphStore {
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
    edge_lookup: HashMap<EdgeId, usize>,
    incident: HashMap<NodeId, Vec<usize>>,
    poi_nodes: HashMap<PoiId, NodeId>,
    node_tree: RTree<IndexedNode>,
    edge_tree: RTree<IndexedEdge>,
    max_snap_distance_m: f64,
    fastest_speed_kmh: f64,
}

impl InMemoryGraphStore {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, Error> {
        let mut node_map = HashMap::with_capacity(nodes.len());
        let mut poi_nodes = HashMap::new();
        for node in nodes {
            if let Some(poi_id) = node.poi_id {
                poi_nodes.insert(poi_id, node.id);
            }
            let id = node.id;
            if node_map.insert(id, node).is_some() {
                return Err(Error::InvalidData(format!("duplicate node id {id}")));
            }
        }

        let mut edges = edges;
        let mut edge_lookup = HashMap::with_capacity(edges.len());
        let mut incident: HashMap<NodeId, Vec<usize>> = HashMap::with_capacity(node_map.len());
        let mut edge_entries = Vec::with_capacity(edges.len());
        let mut fastest_speed_kmh: f64 = 0.0;

        for (idx, edge) in edges.iter_mut().enumerate() {
            let (Some(source), Some(target)) =
                (node_map.get(&edge.source), node_map.get(&edge.target))
            else {
                return Err(Error::InvalidData(format!(
                    "edge {} references unknown node ({} -> {})",
                    edge.id, edge.source, edge.target
                )));
            };
            if edge_lookup.insert(edge.id, idx).is_some() {
                return Err(Error::InvalidData(format!("duplicate edge id {}", edge.id)));
            }

            edge.fill_travel_time();
            fastest_speed_kmh = fastest_speed_kmh.max(straight_line_speed_kmh(edge, source, target));
            edge_entries.push(IndexedEdge::new(
                Rectangle::from_corners([source.lon, source.lat], [target.lon, target.lat]),
                idx,
            ));

            incident.entry(edge.source).or_default().push(idx);
            if edge.target != edge.source {
                incident.entry(edge.target).or_default().push(idx);
            }
        }

        let node_entries = node_map
            .values()
            .map(|node| IndexedNode::new([node.lon, node.lat], node.id))
            .collect();

        info!(
            "Indexed road graph with {} nodes and {} edges",
            node_map.len(),
            edges.len()
        );

        Ok(Self {
            nodes: node_map,
            edges,
            edge_lookup,
            incident,
            poi_nodes,
            node_tree: RTree::bulk_load(node_entries),
            edge_tree: RTree::bulk_load(edge_entries),
            max_snap_distance_m: DEFAULT_MAX_SNAP_DISTANCE_M,
            fastest_speed_kmh,
        })
    }

    #[must_use]
    pub fn with_max_snap_distance(mut self, meters: f64) -> Self {
        self.max_snap_distance_m = meters;
        self
    }

    pub fn max_snap_distance_m(&self) -> f64 {
        self.max_snap_distance_m
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_lookup.get(&id).map(|&idx| &self.edges[idx])
    }

    fn envelope(bbox: &BoundingBox) -> AABB<[f64; 2]> {
        let (lower, upper) = bbox.corners();
        AABB::from_corners(lower, upper)
    }
}

impl GraphStore for InMemoryGraphStore {
    fn find_node(&self, id: NodeId) -> Result<Option<Node>, Error> {
        Ok(self.nodes.get(&id).cloned())
    }

    fn find_nodes_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Node>, Error> {
        let mut nodes: Vec<Node> = self
            .node_tree
            .locate_in_envelope(&Self::envelope(bbox))
            .filter_map(|entry| self.nodes.get(&entry.data).cloned())
            .collect();
        nodes.sort_unstable_by_key(|n| n.id);
        Ok(nodes)
    }

    fn find_nearest_node(&self, lat: f64, lon: f64) -> Result<Option<Node>, Error> {
        let query = geo::Point::new(lon, lat);
        let mut best: Option<(f64, &Node)> = None;
        let mut floor: f64 = 0.0;

        // R-tree order is in degrees; walk it until no remaining candidate
        // can beat the best great-circle distance. Any farther node is reached
        // across every nearer degree radius, so the running maximum bounds it.
        for entry in self.node_tree.nearest_neighbor_iter(&[lon, lat]) {
            let [x, y] = *entry.geom();
            floor = floor.max(metric_lower_bound(lat, (x - lon).hypot(y - lat)));
            if floor > best.map_or(self.max_snap_distance_m, |(distance, _)| distance) {
                break;
            }
            let Some(node) = self.nodes.get(&entry.data) else {
                continue;
            };
            let distance = node.distance_m(query);
            let closer = best.is_none_or(|(best_distance, best_node)| {
                distance < best_distance || (distance == best_distance && node.id < best_node.id)
            });
            if closer {
                best = Some((distance, node));
            }
        }

        Ok(best
            .filter(|(distance, _)| *distance <= self.max_snap_distance_m)
            .map(|(_, node)| node.clone()))
    }

    fn find_edges_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Edge>, Error> {
        let mut edges: Vec<Edge> = self
            .edge_tree
            .locate_in_envelope_intersecting(&Self::envelope(bbox))
            .map(|entry| &self.edges[entry.data])
            .filter(|edge| {
                // The envelope of a diagonal segment can cross the box while
                // both endpoints stay outside
                [edge.source, edge.target].iter().any(|id| {
                    self.nodes
                        .get(id)
                        .is_some_and(|node| bbox.contains(node.lat, node.lon))
                })
            })
            .cloned()
            .collect();
        edges.sort_unstable_by_key(|e| e.id);
        Ok(edges)
    }

    fn find_neighbor_edges(&self, node_id: NodeId) -> Result<Vec<Edge>, Error> {
        Ok(self
            .incident
            .get(&node_id)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&idx| &self.edges[idx])
                    .filter(|edge| edge.other_end(node_id).is_some())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn find_edge_between(
        &self,
        source_id: NodeId,
        target_id: NodeId,
    ) -> Result<Option<Edge>, Error> {
        Ok(self.incident.get(&source_id).and_then(|indices| {
            indices
                .iter()
                .map(|&idx| &self.edges[idx])
                .find(|edge| edge.source == source_id && edge.target == target_id)
                .cloned()
        }))
    }

    fn find_nodes(&self, ids: &[NodeId]) -> Result<Vec<Node>, Error> {
        Ok(ids.iter().filter_map(|id| self.nodes.get(id)).cloned().collect())
    }

    fn fastest_speed_kmh(&self) -> Option<f64> {
        (self.fastest_speed_kmh > 0.0).then_some(self.fastest_speed_kmh)
    }

    fn find_node_by_poi(&self, poi_id: PoiId) -> Result<Option<Node>, Error> {
        Ok(self
            .poi_nodes
            .get(&poi_id)
            .and_then(|id| self.nodes.get(id))
            .cloned())
    }
}

/// Speed at which the edge covers the great circle between its endpoints,
/// or its own length when that is longer
fn straight_line_speed_kmh(edge: &Edge, source: &Node, target: &Node) -> f64 {
    let meters = edge.distance_m.max(source.distance_m(target.geometry()));
    match edge.travel_time() {
        0 if meters > 0.0 => f64::INFINITY,
        0 => 0.0,
        seconds => meters * 3.6 / f64::from(seconds),
    }
}

/// Meters that a point `degrees` away in lon/lat space is at least from a
/// query at `lat`; longitude shrinks by the cosine of the highest latitude
/// the point can sit at
fn metric_lower_bound(lat: f64, degrees: f64) -> f64 {
    let highest = (lat.abs() + degrees).min(90.0);
    degrees * METERS_PER_DEGREE * highest.to_radians().cos()
}
