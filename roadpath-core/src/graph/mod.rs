//! Bounded in-memory slices of the road graph

mod loader;
mod subgraph;

pub use loader::SubgraphLoader;
pub use subgraph::Subgraph;
