//! Page lifecycle service
//!
//! Turns a save request into the right sequence of store calls. A save
//! carries the title the page was opened under plus the submitted title
//! and body; when they differ the page is moved.

use crate::error::Result;
use crate::page::{validate_new_title, validate_title, Page, NEW_PAGE_SENTINEL};
use crate::storage::PageStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct PageService {
    store: Arc<dyn PageStore>,
}

impl PageService {
    pub fn new(store: Arc<dyn PageStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn PageStore> {
        &self.store
    }

    /// Create, update or rename a page.
    ///
    /// `previous_title` is [`NEW_PAGE_SENTINEL`] when the page is being
    /// created. Both titles are validated before anything is written.
    pub async fn save(
        &self,
        previous_title: &str,
        new_title: &str,
        body: impl Into<Vec<u8>>,
    ) -> Result<()> {
        validate_new_title(new_title)?;

        let renamed_from = if previous_title == NEW_PAGE_SENTINEL || previous_title == new_title {
            None
        } else {
            validate_title(previous_title)?;
            Some(previous_title)
        };

        let page = Page::new(new_title, body);
        self.store.upsert(&page).await?;

        match renamed_from {
            None => {
                debug!("Saved page {} ({} bytes)", page.title, page.body.len());
            }
            Some(old_title) => {
                info!("Renaming page {} -> {}", old_title, new_title);
                // The new record is already durable, so a failure here only
                // leaves the old title behind.
                if let Err(e) = self.store.delete(old_title).await {
                    warn!(
                        "Page {} saved but old title {} could not be removed: {}",
                        new_title, old_title, e
                    );
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Fetch a page; `WikiError::NotFound` when it does not exist
    pub async fn load(&self, title: &str) -> Result<Page> {
        self.store.get(title).await
    }

    pub async fn remove(&self, title: &str) -> Result<()> {
        info!("Deleting page {}", title);
        self.store.delete(title).await
    }

    pub async fn list_all(&self) -> Result<Vec<String>> {
        self.store.list().await
    }
}
