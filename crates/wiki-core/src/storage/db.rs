//! SQLite record store: one row per page in a single `pages` table

use super::PageStore;
use crate::error::{Result, WikiError};
use crate::page::{validate_title, Page};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database file at `database_path` and run migrations
    pub async fn open(database_path: impl AsRef<Path>) -> Result<Self> {
        let database_path = database_path.as_ref();
        tracing::info!("Opening SQLite database at: {}", database_path.display());

        if let Some(parent) = database_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new().filename(database_path);
        Self::connect_with(options, false).await
    }

    /// Connect through a `sqlite:` URL such as `sqlite://data/wiki.db` or `sqlite::memory:`.
    ///
    /// The database file is created when missing.
    pub async fn connect(url: &str) -> Result<Self> {
        tracing::info!("Connecting to SQLite database at: {}", url);

        let options = SqliteConnectOptions::from_str(url)?;
        Self::connect_with(options, url.contains(":memory:")).await
    }

    async fn connect_with(options: SqliteConnectOptions, in_memory: bool) -> Result<Self> {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // Each connection to an in-memory database sees its own empty database,
        // so keep exactly one alive for the life of the pool.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if it is missing
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::run_migrations(&pool).await?;
        tracing::info!("Database initialization complete");
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pages (
                title TEXT PRIMARY KEY,
                body BLOB NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl PageStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, title: &str) -> Result<Page> {
        validate_title(title)?;

        let row: Option<(String, Vec<u8>)> = sqlx::query_as(
            r#"
            SELECT title, body FROM pages WHERE title = ?1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(title, body)| Page::new(title, body))
            .ok_or_else(|| WikiError::NotFound(title.to_string()))
    }

    async fn upsert(&self, page: &Page) -> Result<()> {
        validate_title(&page.title)?;

        sqlx::query(
            r#"
            INSERT INTO pages (title, body)
            VALUES (?1, ?2)
            ON CONFLICT(title)
            DO UPDATE SET body = excluded.body
            "#,
        )
        .bind(&page.title)
        .bind(&page.body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, title: &str) -> Result<()> {
        validate_title(title)?;

        let result = sqlx::query(
            r#"
            DELETE FROM pages WHERE title = ?1
            "#,
        )
        .bind(title)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Page {} already absent", title);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let titles: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT title FROM pages ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(titles)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
