//! In-memory page store using DashMap (non-durable, for development and tests)

use super::PageStore;
use crate::error::{Result, WikiError};
use crate::page::{validate_title, Page};
use async_trait::async_trait;
use dashmap::DashMap;

pub struct MemoryStore {
    pages: DashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            pages: DashMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, title: &str) -> Result<Page> {
        validate_title(title)?;
        self.pages
            .get(title)
            .map(|body| Page::new(title, body.value().clone()))
            .ok_or_else(|| WikiError::NotFound(title.to_string()))
    }

    async fn upsert(&self, page: &Page) -> Result<()> {
        validate_title(&page.title)?;
        self.pages.insert(page.title.clone(), page.body.clone());
        Ok(())
    }

    async fn delete(&self, title: &str) -> Result<()> {
        validate_title(title)?;
        self.pages.remove(title);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.pages.iter().map(|entry| entry.key().clone()).collect())
    }
}
