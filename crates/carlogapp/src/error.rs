use crate::model::{Collection, RecordId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarlogError {
    #[error("No active vehicle selected")]
    NoActiveVehicle,

    #[error("{collection} not found: {id}")]
    NotFound {
        collection: Collection,
        id: RecordId,
    },

    #[error("Failed to persist '{key}': {reason}")]
    Persistence { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("No backup snapshot available")]
    NoBackup,

    #[error("Config error: {0}")]
    Config(String),
}

impl CarlogError {
    pub fn not_found(collection: Collection, id: &RecordId) -> Self {
        Self::NotFound {
            collection,
            id: id.clone(),
        }
    }

    pub fn persistence(key: &str, reason: impl ToString) -> Self {
        Self::Persistence {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CarlogError>;
