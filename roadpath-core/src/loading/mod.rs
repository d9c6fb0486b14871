//! This module is responsible for loading the road graph produced by the
//! ingestion pipeline (node and edge CSV files) into an in-memory store.

mod builder;
mod config;
mod parser;
mod raw_types;

pub use builder::load_graph_store;
pub use config::GraphDataConfig;
pub use parser::deserialize_csv_file;
pub use raw_types::{RawEdge, RawNode};
