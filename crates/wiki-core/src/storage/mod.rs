//! Storage layer
//!
//! Every backend stores pages keyed by title and implements the same
//! [`PageStore`] contract, so the service and handlers never care which
//! one is configured.

pub mod db;
pub mod file;
pub mod memory;

pub use db::SqliteStore;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::page::Page;
use async_trait::async_trait;

/// Durable CRUD over pages keyed by title
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    /// Fetch the page stored under exactly `title`.
    ///
    /// Fails with `WikiError::NotFound` when no record exists.
    async fn get(&self, title: &str) -> Result<Page>;

    /// Create the page, or replace the body of the existing record with its title.
    ///
    /// A reader never observes a partially written body.
    async fn upsert(&self, page: &Page) -> Result<()>;

    /// Remove the record for `title`. Removing an absent title succeeds.
    async fn delete(&self, title: &str) -> Result<()>;

    /// All stored titles, in whatever order the medium yields them
    async fn list(&self) -> Result<Vec<String>>;

    /// Release the underlying medium on shutdown
    async fn close(&self) {}
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every backend must share

    use super::*;
    use crate::error::WikiError;

    pub async fn upsert_replaces_body(store: &dyn PageStore) {
        store.upsert(&Page::new("T", "B1")).await.unwrap();
        store.upsert(&Page::new("T", "B2")).await.unwrap();

        assert_eq!(store.get("T").await.unwrap().body, b"B2");
        assert_eq!(store.list().await.unwrap(), vec!["T".to_string()]);
    }

    pub async fn get_missing_is_not_found(store: &dyn PageStore) {
        let err = store.get("missing").await.unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
    }

    pub async fn delete_is_idempotent(store: &dyn PageStore) {
        store.upsert(&Page::new("gone", "soon")).await.unwrap();
        store.delete("gone").await.unwrap();
        store.delete("gone").await.unwrap();
        assert!(store.get("gone").await.unwrap_err().is_not_found());

        // Never existed at all
        store.delete("never").await.unwrap();
    }

    pub async fn list_is_complete(store: &dyn PageStore) {
        for title in ["a", "b", "c"] {
            store.upsert(&Page::new(title, title)).await.unwrap();
        }
        store.delete("b").await.unwrap();

        let mut titles = store.list().await.unwrap();
        titles.sort();
        assert_eq!(titles, vec!["a".to_string(), "c".to_string()]);
    }

    pub async fn binary_body_round_trips(store: &dyn PageStore) {
        let body = vec![0u8, 159, 146, 150, 255, b'\n'];
        store.upsert(&Page::new("bin", body.clone())).await.unwrap();
        assert_eq!(store.get("bin").await.unwrap(), Page::new("bin", body));
    }

    pub async fn rejects_unsafe_titles(store: &dyn PageStore) {
        let err = store
            .upsert(&Page::new("../escape", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, WikiError::InvalidTitle { .. }));
        assert!(matches!(
            store.get("a/b").await.unwrap_err(),
            WikiError::InvalidTitle { .. }
        ));
        assert!(store.list().await.unwrap().is_empty());
    }

    pub async fn run_all<F, Fut, S>(mut make: F)
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = S>,
        S: PageStore,
    {
        upsert_replaces_body(&make().await).await;
        get_missing_is_not_found(&make().await).await;
        delete_is_idempotent(&make().await).await;
        list_is_complete(&make().await).await;
        binary_body_round_trips(&make().await).await;
        rejects_unsafe_titles(&make().await).await;
    }
}
