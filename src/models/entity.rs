use serde::{de::DeserializeOwned, Serialize};

/// Identity shared by every persisted entity. Always assigned by the caller.
pub type EntityId = i64;

/// Name of the identity field inside a stored document.
pub const ID_FIELD: &str = "_id";

/// Base contract for anything a repository can persist as one document.
///
/// Implementors must serialize their identity under [`ID_FIELD`] so the
/// document store can key on it.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> EntityId;
}
