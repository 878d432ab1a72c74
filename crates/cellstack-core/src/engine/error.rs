use thiserror::Error;

use crate::core::io::catalog::CatalogError;
use crate::engine::derive::DeriveError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Configuration derivation failed for source '{path}': {source}")]
    Derive {
        path: String,
        #[source]
        source: DeriveError,
    },

    #[error("Worker scanning source '{path}' stopped without reporting a result")]
    WorkerLost { path: String },
}

impl EngineError {
    /// The source location at fault, when the failure can be pinned to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Catalog(e) => Some(e.path()),
            Self::Derive { path, .. } | Self::WorkerLost { path } => Some(path),
        }
    }
}
