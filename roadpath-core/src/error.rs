use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No graph node near ({lat}, {lon})")]
    NodeNotFound { lat: f64, lon: f64 },
    #[error("No path found from node {from} to node {to}")]
    PathNotFound { from: NodeId, to: NodeId },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Corrupted cache entry: {0}")]
    CacheDecodeError(String),
    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// Whether the caller may retry the request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }

    /// Lookup failures that end up as `found = false` results rather than errors
    pub(crate) fn is_route_failure(&self) -> bool {
        matches!(self, Error::NodeNotFound { .. } | Error::PathNotFound { .. })
    }
}
