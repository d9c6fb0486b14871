use log::{info, warn};

use super::{GraphDataConfig, RawEdge, RawNode, deserialize_csv_file};
use crate::{Error, InMemoryGraphStore};

/// Reads the node and edge files into an indexed in-memory store
///
/// Rows that fail to parse, nodes with invalid coordinates and edges with
/// invalid lengths are skipped and counted. Edges referencing nodes that are
/// not in the node file are an error.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an invalid configuration,
/// [`Error::IoError`] for unreadable files and [`Error::InvalidData`] for
/// duplicate ids or dangling edges
pub fn load_graph_store(config: &GraphDataConfig) -> Result<InMemoryGraphStore, Error> {
    config.validate()?;

    let (raw_nodes, skipped_rows) = deserialize_csv_file::<RawNode>(&config.nodes_path)?;
    let parsed = raw_nodes.len();
    let nodes: Vec<_> = raw_nodes.into_iter().filter_map(RawNode::into_node).collect();
    let skipped_nodes = skipped_rows + parsed - nodes.len();

    let (raw_edges, skipped_rows) = deserialize_csv_file::<RawEdge>(&config.edges_path)?;
    let parsed = raw_edges.len();
    let edges: Vec<_> = raw_edges.into_iter().filter_map(RawEdge::into_edge).collect();
    let skipped_edges = skipped_rows + parsed - edges.len();

    if skipped_nodes + skipped_edges > 0 {
        warn!("Skipped {skipped_nodes} node rows and {skipped_edges} edge rows");
    }
    info!(
        "Read {} nodes from '{}' and {} edges from '{}'",
        nodes.len(),
        config.nodes_path.display(),
        edges.len(),
        config.edges_path.display()
    );

    Ok(InMemoryGraphStore::new(nodes, edges)?.with_max_snap_distance(config.max_snap_distance_m))
}
