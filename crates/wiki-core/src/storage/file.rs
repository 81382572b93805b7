//! Flat-directory page store: one `<title>.txt` file per page

use super::PageStore;
use crate::error::{Result, WikiError};
use crate::page::{validate_title, Page};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

const EXTENSION: &str = ".txt";
const TEMP_SUFFIX: &str = ".tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store rooted at `dir`, creating the directory if needed
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        info!("Opening file store at: {}", dir.display());

        tokio::fs::create_dir_all(&dir).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700)).await?;
        }

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, title: &str) -> Result<PathBuf> {
        validate_title(title)?;
        Ok(self.dir.join(format!("{title}{EXTENSION}")))
    }

    // Siblings of the target so the final rename stays on one filesystem.
    // The name is independent of the title so it never outgrows the page file name,
    // and the leading dot keeps it out of `list`.
    fn temp_path(&self) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{}-{n}{TEMP_SUFFIX}", std::process::id()))
    }
}

#[async_trait]
impl PageStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn get(&self, title: &str) -> Result<Page> {
        let path = self.path_for(title)?;
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(Page::new(title, body)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(WikiError::NotFound(title.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn upsert(&self, page: &Page) -> Result<()> {
        let path = self.path_for(&page.title)?;
        let temp = self.temp_path();
        debug!("Writing page {} ({} bytes)", page.title, page.body.len());

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let written = async {
            let mut file = options.open(&temp).await?;
            file.write_all(&page.body).await?;
            file.sync_all().await?;
            tokio::fs::rename(&temp, &path).await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete(&self, title: &str) -> Result<()> {
        let path = self.path_for(title)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Page {} already absent", title);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut titles = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if let Some(title) = name.strip_suffix(EXTENSION) {
                if !title.is_empty() && entry.file_type().await?.is_file() {
                    titles.push(title.to_string());
                }
            }
        }

        Ok(titles)
    }
}
