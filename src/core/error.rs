use thiserror::Error;

use crate::walls::validator::ValidationReport;

#[derive(Error, Debug)]
pub enum RampartError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    CatalogParse(String),

    #[error("Unknown wall type: {0}")]
    UnknownWall(String),

    #[error("Invalid wall definition '{id}': {reason}")]
    InvalidWall { id: String, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No active pole - begin a chain before placing")]
    NoActivePole,

    #[error("Placement rejected: {0}")]
    Rejected(ValidationReport),

    #[error("Resource ledger refused to spend {0}")]
    SpendFailed(String),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RampartError>;
