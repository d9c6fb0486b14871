use geo::Point;

use crate::{Edge, EdgeId, Error, Node, NodeId, Seconds};

/// One way of leaving a node: the segment taken, where it leads and its cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub edge: EdgeId,
    pub target: NodeId,
    pub cost: Seconds,
}

/// Graph access used by the search and path reconstruction
pub trait NetworkView {
    fn node(&self, id: NodeId) -> Result<Option<Node>, Error>;

    fn position(&self, id: NodeId) -> Result<Option<Point<f64>>, Error>;

    /// Appends every usable step out of `from` to `out`
    fn steps(&self, from: NodeId, out: &mut Vec<Step>) -> Result<(), Error>;

    /// The segment `edge` when travelled from `from` to `to`, in either stored
    /// direction
    fn resolve_edge(&self, from: NodeId, to: NodeId, edge: EdgeId) -> Result<Option<Edge>, Error>;
}
