use geo::Point;
use hashbrown::HashMap;
use log::debug;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::routing::{NetworkView, Step};
use crate::{BoundingBox, Edge, EdgeId, Error, Node, NodeId};

/// Read-only adjacency index over one search region
///
/// Nodes and edges live in arenas; the directed graph holds one arc per
/// travel direction whose weight is the index of the edge in the edge arena.
/// A segment always contributes to its source's adjacency, and to its
/// target's adjacency only when it is not one-way.
#[derive(Debug, Clone, Default)]
pub struct Subgraph {
    graph: DiGraph<Node, usize>,
    node_lookup: HashMap<NodeId, NodeIndex>,
    edges: Vec<Edge>,
    edge_lookup: HashMap<EdgeId, usize>,
    bbox: Option<BoundingBox>,
}

impl Subgraph {
    /// Builds the index; edges whose endpoints are not among `nodes` are dropped
    pub fn build(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut nodes = nodes;
        nodes.sort_unstable_by_key(|n| n.id);
        nodes.dedup_by_key(|n| n.id);

        let mut edges = edges;
        edges.sort_unstable_by_key(|e| e.id);
        edges.dedup_by_key(|e| e.id);

        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len() * 2);
        let mut node_lookup = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let id = node.id;
            node_lookup.insert(id, graph.add_node(node));
        }

        let mut kept = Vec::with_capacity(edges.len());
        let mut edge_lookup = HashMap::with_capacity(edges.len());
        let mut dropped = 0usize;

        for mut edge in edges {
            let (Some(&source), Some(&target)) =
                (node_lookup.get(&edge.source), node_lookup.get(&edge.target))
            else {
                dropped += 1;
                continue;
            };

            let idx = kept.len();
            graph.add_edge(source, target, idx);
            if !edge.oneway && source != target {
                graph.add_edge(target, source, idx);
            }

            edge.fill_travel_time();
            edge_lookup.insert(edge.id, idx);
            kept.push(edge);
        }

        if dropped > 0 {
            debug!("Dropped {dropped} edges with endpoints outside the subgraph");
        }

        let bbox = BoundingBox::from_points(graph.node_weights().map(Node::geometry));

        Self {
            graph,
            node_lookup,
            edges: kept,
            edge_lookup,
            bbox,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_lookup.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_lookup
            .get(&id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_lookup.get(&id).map(|&idx| &self.edges[idx])
    }

    /// Segments usable when leaving `id`
    pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.node_lookup
            .get(&id)
            .into_iter()
            .flat_map(move |&idx| self.graph.edges(idx))
            .map(move |arc| &self.edges[*arc.weight()])
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox
    }
}

impl NetworkView for Subgraph {
    fn node(&self, id: NodeId) -> Result<Option<Node>, Error> {
        Ok(Subgraph::node(self, id).cloned())
    }

    fn position(&self, id: NodeId) -> Result<Option<Point<f64>>, Error> {
        Ok(Subgraph::node(self, id).map(Node::geometry))
    }

    fn steps(&self, from: NodeId, out: &mut Vec<Step>) -> Result<(), Error> {
        let Some(&idx) = self.node_lookup.get(&from) else {
            return Ok(());
        };
        for arc in self.graph.edges(idx) {
            let edge = &self.edges[*arc.weight()];
            out.push(Step {
                edge: edge.id,
                target: self.graph[arc.target()].id,
                cost: edge.travel_time(),
            });
        }
        Ok(())
    }

    fn resolve_edge(&self, from: NodeId, to: NodeId, edge: EdgeId) -> Result<Option<Edge>, Error> {
        Ok(self
            .edge(edge)
            .filter(|found| found.leads(from, to))
            .cloned())
    }
}
