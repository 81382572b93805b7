//! Wiki Server
//!
//! A small personal note server: pages are viewed, created, edited,
//! renamed and deleted through plain HTTP forms rendered from templates.
//! Pages are kept in flat files, a SQLite database, or memory.

mod config;
mod error;
mod handlers;
mod render;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wiki_core::{FileStore, MemoryStore, PageService, PageStore, SqliteStore};

use config::{Config, StoreKind};
use render::Templates;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<PageService>,
    pub templates: Arc<Templates>,
}

#[tokio::main]
async fn main() {
    // Read before logging starts so RUST_LOG from .env applies
    let dotenv = dotenvy::dotenv();

    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Wiki Server v{}", env!("CARGO_PKG_VERSION"));
    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env: {}", e),
    }

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, store={:?}, templates={}",
        config.bind_address,
        config.store,
        config.template_dir.display()
    );

    let store = open_store(&config).await?;
    info!("Using {} page store", store.name());

    let state = AppState {
        pages: Arc::new(PageService::new(store.clone())),
        templates: Arc::new(Templates::new(&config.template_dir)),
    };
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down, closing {} store", store.name());
    store.close().await;
    Ok(())
}

async fn open_store(config: &Config) -> Result<Arc<dyn PageStore>> {
    if config.store != StoreKind::Memory {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create data directory: {}",
                    config.data_dir.display()
                )
            })?;
    }

    let store: Arc<dyn PageStore> = match config.store {
        StoreKind::File => Arc::new(
            FileStore::new(&config.pages_dir)
                .await
                .with_context(|| {
                    format!("Failed to open pages directory: {}", config.pages_dir.display())
                })?,
        ),
        StoreKind::Sqlite => Arc::new(match &config.database_url {
            Some(url) => SqliteStore::connect(url)
                .await
                .with_context(|| format!("Failed to connect to database: {}", url))?,
            None => SqliteStore::open(&config.database_path)
                .await
                .with_context(|| {
                    format!(
                        "Failed to open database: {}",
                        config.database_path.display()
                    )
                })?,
        }),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    };

    Ok(store)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
