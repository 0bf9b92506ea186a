use thiserror::Error;

use crate::{markup::MarkupErrors, models::EntityId, store::StoreError};

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Failures surfaced by repositories. A missing document is never one of them.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Rejected before any store interaction.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("an entity with id {0} already exists")]
    DuplicateKey(EntityId),
    #[error(transparent)]
    Store(StoreError),
}

impl RepositoryError {
    pub fn invalid_html(errors: MarkupErrors) -> Self {
        Self::InvalidArgument {
            name: "html",
            reason: errors.to_string(),
        }
    }
}

impl From<StoreError> for RepositoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateKey { id, .. } => Self::DuplicateKey(id),
            other => Self::Store(other),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(value: serde_json::Error) -> Self {
        Self::Store(StoreError::Serialization(value))
    }
}
