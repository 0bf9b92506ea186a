use async_trait::async_trait;

use super::RepoResult;
use crate::models::{Entity, EntityId};

/// CRUD contract shared by every entity repository.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All entities in store order.
    async fn get_all(&self) -> RepoResult<Vec<T>>;
    /// `None` when no entity has this id.
    async fn get(&self, id: EntityId) -> RepoResult<Option<T>>;
    /// Fails with `DuplicateKey` when the id is taken.
    async fn create(&self, item: T) -> RepoResult<T>;
    /// No-op when the id does not exist.
    async fn update(&self, item: T) -> RepoResult<()>;
    /// No-op when the id does not exist.
    async fn delete(&self, id: EntityId) -> RepoResult<()>;
}
