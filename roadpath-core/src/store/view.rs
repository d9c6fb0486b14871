use std::cell::Cell;

use geo::Point;
use log::debug;

use super::GraphStore;
use crate::routing::{NetworkView, Step};
use crate::{Edge, EdgeId, Error, Node, NodeId};

/// Search view answering every lookup with a store round-trip
///
/// This is the slow path for searches without a preloaded
/// [`Subgraph`](crate::Subgraph): each expanded node costs one neighbor query
/// and one position query per discovered neighbor.
pub struct StoreView<'a> {
    store: &'a dyn GraphStore,
    round_trips: Cell<usize>,
}

impl<'a> StoreView<'a> {
    pub fn new(store: &'a dyn GraphStore) -> Self {
        debug!("Searching without a preloaded subgraph, querying the store per node");
        Self {
            store,
            round_trips: Cell::new(0),
        }
    }

    pub fn round_trips(&self) -> usize {
        self.round_trips.get()
    }

    fn count(&self) {
        self.round_trips.set(self.round_trips.get() + 1);
    }
}

impl NetworkView for StoreView<'_> {
    fn node(&self, id: NodeId) -> Result<Option<Node>, Error> {
        self.count();
        self.store.find_node(id)
    }

    fn position(&self, id: NodeId) -> Result<Option<Point<f64>>, Error> {
        Ok(self.node(id)?.map(|node| node.geometry()))
    }

    fn steps(&self, from: NodeId, out: &mut Vec<Step>) -> Result<(), Error> {
        self.count();
        for edge in self.store.find_neighbor_edges(from)? {
            if let Some(target) = edge.other_end(from) {
                out.push(Step {
                    edge: edge.id,
                    target,
                    cost: edge.travel_time(),
                });
            }
        }
        Ok(())
    }

    fn resolve_edge(&self, from: NodeId, to: NodeId, edge: EdgeId) -> Result<Option<Edge>, Error> {
        self.count();
        if let Some(found) = self.store.find_edge_between(from, to)?
            && found.id == edge
        {
            return Ok(Some(found));
        }

        // Travelled against the stored direction
        self.count();
        if let Some(found) = self.store.find_edge_between(to, from)?
            && found.id == edge
            && !found.oneway
        {
            return Ok(Some(found));
        }

        // Parallel segments between the same pair of nodes
        self.count();
        Ok(self
            .store
            .find_neighbor_edges(from)?
            .into_iter()
            .find(|found| found.id == edge && found.leads(from, to)))
    }
}
