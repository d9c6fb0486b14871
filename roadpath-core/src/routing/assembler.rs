//! Turning search backpointers into routes, and chaining routes together

use itertools::Itertools;
use log::trace;

use super::network::NetworkView;
use crate::{EdgeId, Error, Node, NodeId, RouteResult};

/// One node of a reconstructed path and the segment used to reach it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub node: NodeId,
    pub via: Option<EdgeId>,
}

pub struct RouteAssembler;

impl RouteAssembler {
    /// Resolves the nodes and segments of a path given in travel order
    pub fn assemble<V>(
        view: &V,
        path: &[PathStep],
        nodes_explored: usize,
    ) -> Result<RouteResult, Error>
    where
        V: NetworkView + ?Sized,
    {
        let mut nodes = Vec::with_capacity(path.len());
        let mut edges = Vec::with_capacity(path.len().saturating_sub(1));

        for (idx, step) in path.iter().enumerate() {
            let node = view
                .node(step.node)?
                .ok_or_else(|| Error::InvalidData(format!("node {} vanished", step.node)))?;

            if idx > 0 {
                let from = path[idx - 1].node;
                let edge_id = step.via.ok_or_else(|| {
                    Error::InvalidData(format!("no segment recorded into node {}", step.node))
                })?;
                let edge = view.resolve_edge(from, step.node, edge_id)?.ok_or_else(|| {
                    Error::InvalidData(format!(
                        "segment {edge_id} does not lead from {from} to {}",
                        step.node
                    ))
                })?;
                edges.push(edge);
            }
            nodes.push(node);
        }

        Ok(RouteResult::from_path(nodes, edges, nodes_explored))
    }

    /// Chains consecutive segment routes into one route
    ///
    /// Edge lists are concatenated and the junction node shared by two
    /// consecutive segments appears once. If any segment failed, the merged
    /// route is not found and carries every segment's error message.
    pub fn merge(segments: Vec<RouteResult>) -> RouteResult {
        let start = segments.first().and_then(|s| s.start_node);
        let end = segments.last().and_then(|s| s.end_node);
        let explored = segments.iter().map(|s| s.nodes_explored).sum();
        let computation_ms: f64 = segments.iter().map(|s| s.computation_time_ms).sum();

        if segments.is_empty() {
            return RouteResult::not_found("No route segments to merge", 0);
        }

        let failures = segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| !segment.found)
            .map(|(idx, segment)| {
                format!(
                    "segment {}: {}",
                    idx + 1,
                    segment.error_message.as_deref().unwrap_or("no path found")
                )
            })
            .join("; ");

        if !failures.is_empty() {
            let mut failed = RouteResult::not_found(failures, explored).with_endpoints(start, end);
            failed.computation_time_ms = computation_ms;
            return failed;
        }

        let all_cached = segments.iter().all(|s| s.from_cache);
        let mut nodes: Vec<Node> = Vec::new();
        let mut edges = Vec::new();

        for (idx, segment) in segments.into_iter().enumerate() {
            let mut segment_nodes = segment.nodes.into_iter().peekable();
            if let (Some(last), Some(first)) = (nodes.last(), segment_nodes.peek())
                && last.id == first.id
            {
                trace!("Eliding junction node {} before segment {}", first.id, idx + 1);
                segment_nodes.next();
            }
            nodes.extend(segment_nodes);
            edges.extend(segment.edges);
        }

        let mut merged = RouteResult::from_path(nodes, edges, explored);
        merged.computation_time_ms = computation_ms;
        merged.from_cache = all_cached;
        merged
    }
}
