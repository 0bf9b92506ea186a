use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;

use super::{RepoResult, Repository, RepositoryError};
use crate::{
    models::{Entity, EntityId},
    store::{DocumentStore, SqliteDocumentStore, StoreConfig, StoreError},
};

/// Generic repository: maps entities to documents of one collection and back.
/// Knows nothing about any particular entity type.
pub struct DocumentRepository<T: Entity> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for DocumentRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> DocumentRepository<T> {
    /// Opens the configured store eagerly; fails fast when it cannot be opened.
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let store = SqliteDocumentStore::connect(config)?;
        log::info!(
            "📚 Document repository ready: endpoint={} database={} collection={}",
            config.endpoint,
            config.database,
            config.collection
        );
        Ok(Self::with_store(Arc::new(store)))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// The underlying collection, for specialized repositories that need
    /// operations beyond plain CRUD.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for DocumentRepository<T> {
    async fn get_all(&self) -> RepoResult<Vec<T>> {
        let docs = self.store.find_all().await?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(RepositoryError::from))
            .collect()
    }

    async fn get(&self, id: EntityId) -> RepoResult<Option<T>> {
        match self.store.find_one(id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, item: T) -> RepoResult<T> {
        let doc = serde_json::to_value(&item)?;
        self.store.insert_one(doc).await?;
        log::debug!("created {} {}", self.store.collection(), item.id());
        Ok(item)
    }

    async fn update(&self, item: T) -> RepoResult<()> {
        let id = item.id();
        let matched = self
            .store
            .replace_one(id, serde_json::to_value(&item)?)
            .await?;
        if matched == 0 {
            log::debug!("update of missing {} {} ignored", self.store.collection(), id);
        }
        Ok(())
    }

    async fn delete(&self, id: EntityId) -> RepoResult<()> {
        let deleted = self.store.delete_one(id).await?;
        log::debug!("deleted {deleted} {} document(s) with id {id}", self.store.collection());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(rename = "_id")]
        id: EntityId,
        text: String,
        tags: Vec<String>,
    }

    impl Entity for Note {
        fn id(&self) -> EntityId {
            self.id
        }
    }

    fn note(id: EntityId, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
            tags: vec!["a".to_string()],
        }
    }

    fn repo() -> DocumentRepository<Note> {
        DocumentRepository::connect(&StoreConfig::in_memory("notes")).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_returns_same_entity() {
        let repo = repo();
        let created = repo.create(note(1, "first")).await.unwrap();
        assert_eq!(created, note(1, "first"));
        assert_eq!(repo.get(1).await.unwrap(), Some(note(1, "first")));
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        assert_eq!(repo().get(404).await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_duplicate_is_rejected() {
        let repo = repo();
        repo.create(note(2, "a")).await.unwrap();
        let err = repo.create(note(2, "b")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateKey(2)));
        assert_eq!(repo.get(2).await.unwrap(), Some(note(2, "a")));
    }

    #[tokio::test]
    async fn update_replaces_whole_entity() {
        let repo = repo();
        repo.create(note(3, "before")).await.unwrap();

        let replaced = Note {
            id: 3,
            text: "after".to_string(),
            tags: Vec::new(),
        };
        repo.update(replaced.clone()).await.unwrap();
        assert_eq!(repo.get(3).await.unwrap(), Some(replaced));
    }

    #[tokio::test]
    async fn update_missing_is_noop() {
        let repo = repo();
        repo.update(note(9, "ghost")).await.unwrap();
        assert_eq!(repo.get(9).await.unwrap(), None);
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = repo();
        repo.create(note(4, "x")).await.unwrap();
        repo.delete(4).await.unwrap();
        repo.delete(4).await.unwrap();
        assert_eq!(repo.get(4).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_all_lists_every_entity() {
        let repo = repo();
        assert!(repo.get_all().await.unwrap().is_empty());
        for id in [5, 1, 3] {
            repo.create(note(id, "n")).await.unwrap();
        }
        let mut ids: Vec<_> = repo.get_all().await.unwrap().iter().map(|n| n.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 3, 5]);
    }
}
