use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] roadpath_core::Error),
    #[error("Failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("No road graph configured: pass --nodes and --edges or set [graph] in the config")]
    MissingGraph,
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Exit with EX_TEMPFAIL so wrappers know a retry may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, CliError::Core(e) if e.is_retryable())
    }
}
