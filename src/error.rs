use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Literal reason reported when E-utilities answers with its soft-failure page.
pub const SERVICE_UNAVAILABLE_REASON: &str = "Service Temporarily Unavailable";

#[derive(Debug, Error, Diagnostic)]
pub enum CymolError {
    #[error("Entrez database is missing (\"db\" key in params)")]
    MissingDatabase,

    #[error("Entrez UIDs are missing (\"id\" key in params)")]
    MissingIds,

    #[error("invalid structure id: {0}")]
    InvalidStructureId(String),

    #[error("request to {host} failed: {message}")]
    Transport { host: String, message: String },

    #[error("{host} returned status {status}")]
    Status { host: String, status: u16 },

    #[error("request cancelled")]
    Cancelled,

    #[error("{}", SERVICE_UNAVAILABLE_REASON)]
    ServiceUnavailable,

    #[error("{id}: {message}")]
    Parse { id: String, message: String },

    #[error("no normalizer for database {database:?} with rettype {return_type:?}")]
    UnsupportedCombination {
        database: String,
        return_type: String,
    },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    ServiceUnavailable,
    Parse,
    Unsupported,
    Config,
}

impl CymolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CymolError::MissingDatabase
            | CymolError::MissingIds
            | CymolError::InvalidStructureId(_) => ErrorKind::Validation,
            CymolError::Transport { .. } | CymolError::Status { .. } | CymolError::Cancelled => {
                ErrorKind::Transport
            }
            CymolError::ServiceUnavailable => ErrorKind::ServiceUnavailable,
            CymolError::Parse { .. } => ErrorKind::Parse,
            CymolError::UnsupportedCombination { .. } => ErrorKind::Unsupported,
            CymolError::ConfigRead(_) | CymolError::ConfigParse(_) | CymolError::HttpClient(_) => {
                ErrorKind::Config
            }
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}
