use thiserror::Error;

use crate::models::EntityId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key {id} in collection {collection}")]
    DuplicateKey { collection: String, id: EntityId },
    #[error("invalid store endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("invalid {kind} name: {name:?}")]
    InvalidName { kind: &'static str, name: String },
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("store connection lock poisoned")]
    Poisoned,
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
