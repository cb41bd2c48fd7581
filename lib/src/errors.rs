// lib/src/errors.rs

use std::path::PathBuf;

use thiserror::Error;

pub use models::errors::{ErrorCode, PrescriptionError, PrescriptionResult, StoreError, StoreResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}
