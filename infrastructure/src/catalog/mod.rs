//! Subject catalog loading

use std::path::{Path, PathBuf};
use swarm_domain::{DomainError, SubjectCatalog};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },
}

/// Loads the subject catalog from a JSON file.
pub struct CatalogLoader;

impl CatalogLoader {
    /// A missing file yields an empty catalog (commands will then fail with
    /// "no matching subjects"); an unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<SubjectCatalog, CatalogError> {
        if !path.exists() {
            warn!("Catalog file not found: {}", path.display());
            return Ok(SubjectCatalog::default());
        }

        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = SubjectCatalog::from_json(&json).map_err(|source| CatalogError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded {} subjects from {}", catalog.len(), path.display());
        Ok(catalog)
    }
}
