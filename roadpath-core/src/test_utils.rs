//! Synthetic road graphs shared by unit tests

use std::{cmp::Ordering, collections::BinaryHeap};

use geo::{Distance, Haversine};
use hashbrown::HashMap;

use crate::{Edge, GraphStore, InMemoryGraphStore, Node, NodeId, Seconds};

/// A(0,0) - B(0,1) - C(0,2), bidirectional, 60 s per segment, and an
/// isolated node D(0,3)
pub(crate) fn line_store() -> InMemoryGraphStore {
    let nodes = vec![
        Node::new(1, 0.0, 0.0).with_name("A"),
        Node::new(2, 0.0, 1.0).with_name("B"),
        Node::new(3, 0.0, 2.0).with_name("C"),
        Node::new(4, 0.0, 3.0).with_name("D"),
    ];
    let edges = vec![
        Edge::new(1, 1, 2, 111_195.0).with_travel_time(60),
        Edge::new(2, 2, 3, 111_195.0).with_travel_time(60),
    ];
    InMemoryGraphStore::new(nodes, edges).expect("valid line graph")
}

/// `size` x `size` grid spaced `step_deg` apart, node id `row * size + col + 1`.
///
/// Segment lengths are the great-circle distances between their endpoints and
/// travel times are derived from per-row and per-column speeds, so every
/// segment is at least as slow as the search's assumed maximum speed allows.
pub(crate) fn grid_store(size: i64, step_deg: f64) -> InMemoryGraphStore {
    let id = |row: i64, col: i64| row * size + col + 1;

    let mut nodes = Vec::new();
    for row in 0..size {
        for col in 0..size {
            #[allow(clippy::cast_precision_loss)]
            nodes.push(Node::new(
                id(row, col),
                row as f64 * step_deg,
                col as f64 * step_deg,
            ));
        }
    }

    let position = |node_id: NodeId| nodes[usize::try_from(node_id - 1).unwrap()].geometry();
    let mut edges = Vec::new();
    let mut edge_id = 1;
    for row in 0..size {
        for col in 0..size {
            let from = id(row, col);
            let mut link = |to: NodeId, speed: f64| {
                let distance = Haversine.distance(position(from), position(to));
                edges.push(Edge::new(edge_id, from, to, distance).with_max_speed(speed));
                edge_id += 1;
            };
            if col + 1 < size {
                // fast avenue every third row
                link(id(row, col + 1), if row % 3 == 0 { 110.0 } else { 40.0 });
            }
            if row + 1 < size {
                link(id(row + 1, col), if col % 4 == 0 { 90.0 } else { 30.0 });
            }
        }
    }

    InMemoryGraphStore::new(nodes, edges).expect("valid grid graph")
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: Seconds,
    node: NodeId,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap)
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Plain Dijkstra over the store, used as ground truth for A*
pub(crate) fn dijkstra_costs(store: &dyn GraphStore, start: NodeId) -> HashMap<NodeId, Seconds> {
    let mut distances: HashMap<NodeId, Seconds> = HashMap::new();
    let mut heap = BinaryHeap::new();

    heap.push(State {
        cost: 0,
        node: start,
    });
    distances.insert(start, 0);

    while let Some(State { cost, node }) = heap.pop() {
        if distances.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        for edge in store.find_neighbor_edges(node).expect("in-memory store") {
            let Some(next) = edge.other_end(node) else {
                continue;
            };
            let next_cost = cost + edge.travel_time();
            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    distances
}
