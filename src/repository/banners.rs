use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};

use super::{DocumentRepository, RepoResult, Repository, RepositoryError};
use crate::{
    markup,
    models::{Banner, EntityId},
    store::{StoreConfig, StoreError},
};

/// Banner rules on top of the generic repository: html must be well formed,
/// `created` is stamped once on create, and updates only ever touch `html`
/// and `modified`.
#[derive(Clone)]
pub struct BannersRepository {
    base: DocumentRepository<Banner>,
}

impl BannersRepository {
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        Ok(Self::new(DocumentRepository::connect(config)?))
    }

    pub fn new(base: DocumentRepository<Banner>) -> Self {
        Self { base }
    }
}

fn validate_html(html: &str) -> RepoResult<()> {
    markup::validate(html).map_err(|errors| {
        log::warn!("rejected banner html: {errors}");
        RepositoryError::invalid_html(errors)
    })
}

#[async_trait]
impl Repository<Banner> for BannersRepository {
    async fn get_all(&self) -> RepoResult<Vec<Banner>> {
        self.base.get_all().await
    }

    async fn get(&self, id: EntityId) -> RepoResult<Option<Banner>> {
        self.base.get(id).await
    }

    async fn create(&self, mut banner: Banner) -> RepoResult<Banner> {
        validate_html(&banner.html)?;

        banner.created = Utc::now();
        banner.modified = None;
        self.base.create(banner).await
    }

    async fn update(&self, banner: Banner) -> RepoResult<()> {
        validate_html(&banner.html)?;

        let mut fields = Map::new();
        fields.insert("html".to_string(), Value::String(banner.html));
        fields.insert("modified".to_string(), serde_json::to_value(Utc::now())?);

        let matched = self.base.store().update_one(banner.id, fields).await?;
        if matched == 0 {
            log::debug!("update of missing banner {} ignored", banner.id);
        }
        Ok(())
    }

    async fn delete(&self, id: EntityId) -> RepoResult<()> {
        self.base.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::store::{DocumentStore, SqliteDocumentStore};

    /// Counts every call that reaches the store.
    struct CountingStore {
        inner: SqliteDocumentStore,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        fn collection(&self) -> &str {
            self.inner.collection()
        }

        async fn insert_one(&self, document: Value) -> Result<(), StoreError> {
            self.hit();
            self.inner.insert_one(document).await
        }

        async fn find_all(&self) -> Result<Vec<Value>, StoreError> {
            self.hit();
            self.inner.find_all().await
        }

        async fn find_one(&self, id: EntityId) -> Result<Option<Value>, StoreError> {
            self.hit();
            self.inner.find_one(id).await
        }

        async fn replace_one(&self, id: EntityId, document: Value) -> Result<u64, StoreError> {
            self.hit();
            self.inner.replace_one(id, document).await
        }

        async fn update_one(
            &self,
            id: EntityId,
            fields: Map<String, Value>,
        ) -> Result<u64, StoreError> {
            self.hit();
            self.inner.update_one(id, fields).await
        }

        async fn delete_one(&self, id: EntityId) -> Result<u64, StoreError> {
            self.hit();
            self.inner.delete_one(id).await
        }
    }

    fn counting_repo() -> (BannersRepository, Arc<CountingStore>) {
        let store = Arc::new(CountingStore {
            inner: SqliteDocumentStore::connect(&StoreConfig::in_memory("banners")).unwrap(),
            calls: AtomicUsize::new(0),
        });
        let repo = BannersRepository::new(DocumentRepository::with_store(store.clone()));
        (repo, store)
    }

    #[tokio::test]
    async fn invalid_html_never_reaches_store() {
        let (repo, store) = counting_repo();

        for html in ["<html></span>", "<html></span></html>", "<html></span><span></html>"] {
            let err = repo.create(Banner::new(1, html)).await.unwrap_err();
            assert!(matches!(err, RepositoryError::InvalidArgument { name: "html", .. }));
            let err = repo.update(Banner::new(1, html)).await.unwrap_err();
            assert!(matches!(err, RepositoryError::InvalidArgument { name: "html", .. }));
        }

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_stamps_created_and_clears_modified() {
        let (repo, _) = counting_repo();
        let mut banner = Banner::new(2, "<p>hi</p>");
        banner.created = Utc::now() - chrono::Duration::days(10);
        banner.modified = Some(Utc::now());

        let before = Utc::now();
        let created = repo.create(banner).await.unwrap();
        let after = Utc::now();

        assert!(created.created >= before && created.created <= after);
        assert_eq!(created.modified, None);
        assert_eq!(repo.get(2).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn update_touches_only_html_and_modified() {
        let (repo, store) = counting_repo();
        let created = repo.create(Banner::new(3, "")).await.unwrap();

        let mut change = Banner::new(3, "<b>new</b>");
        change.created = Utc::now() + chrono::Duration::days(1);
        let before = Utc::now();
        repo.update(change).await.unwrap();

        let stored = repo.get(3).await.unwrap().unwrap();
        assert_eq!(stored.id, 3);
        assert_eq!(stored.html, "<b>new</b>");
        assert_eq!(stored.created, created.created);
        assert!(stored.modified.is_some_and(|m| m >= before));

        let raw = store.inner.find_one(3).await.unwrap().unwrap();
        let mut keys: Vec<_> = raw.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["_id", "created", "html", "modified"]);
    }
}
