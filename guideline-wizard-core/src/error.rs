// fatal error taxonomy for a refresh run

use std::path::{Path, PathBuf};
use thiserror::Error;

/// errors that abort the run with a non-zero exit
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("area not found: {} (expected a directory inside the repository)", .0.display())]
    AreaNotFound(PathBuf),

    #[error("invalid configuration: {field}: {reason}")]
    ConfigInvalid { field: String, reason: String },

    #[error("persistence failure: {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RefreshError {
    pub fn config_invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn persistence(path: &Path, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.to_path_buf(),
            source,
        }
    }
}
