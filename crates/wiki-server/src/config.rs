//! Server configuration, read once from the environment at startup

use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:42069";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Which page store backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// One text file per page in a flat directory
    File,
    /// One row per page in a SQLite database
    Sqlite,
    /// Non-durable, lost on restart
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "files" => Ok(StoreKind::File),
            "sqlite" | "db" | "database" => Ok(StoreKind::Sqlite),
            "memory" => Ok(StoreKind::Memory),
            other => Err(anyhow!(
                "Unknown store '{}' (expected file, sqlite or memory)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub store: StoreKind,
    pub data_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub database_path: PathBuf,
    /// `sqlite:` URL; takes precedence over `database_path` when set
    pub database_url: Option<String>,
    pub template_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_address = var("WIKI_BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address: SocketAddr = bind_address
            .parse()
            .with_context(|| format!("Failed to parse bind address: {}", bind_address))?;

        let store = match var("WIKI_STORE") {
            Some(s) => s.parse::<StoreKind>()?,
            None => StoreKind::File,
        };

        let data_dir = var("WIKI_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let pages_dir = var("WIKI_PAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("pages"));
        let database_path = var("WIKI_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("wiki.db"));
        let database_url = var("WIKI_DATABASE_URL");
        if let Some(url) = &database_url {
            if !url.starts_with("sqlite:") {
                return Err(anyhow!(
                    "Unsupported database URL '{}' (expected a sqlite: URL)",
                    url
                ));
            }
        }
        if var("WIKI_DATABASE_AUTH_TOKEN").is_some() {
            return Err(anyhow!(
                "WIKI_DATABASE_AUTH_TOKEN is set, but only local SQLite databases are supported"
            ));
        }

        let template_dir = var("WIKI_TEMPLATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR));

        Ok(Config {
            bind_address,
            store,
            data_dir,
            pages_dir,
            database_path,
            database_url,
            template_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:42069".parse().unwrap());
        assert_eq!(config.store, StoreKind::File);
        assert_eq!(config.pages_dir, PathBuf::from("data/pages"));
        assert_eq!(config.database_path, PathBuf::from("data/wiki.db"));
        assert!(config.database_url.is_none());
        assert_eq!(config.template_dir, PathBuf::from("templates"));
    }

    #[test]
    fn test_paths_follow_data_dir() {
        let config =
            config_from(&[("WIKI_DATA_DIR", "/srv/wiki"), ("WIKI_STORE", "SQLite")]).unwrap();
        assert_eq!(config.store, StoreKind::Sqlite);
        assert_eq!(config.pages_dir, PathBuf::from("/srv/wiki/pages"));
        assert_eq!(config.database_path, PathBuf::from("/srv/wiki/wiki.db"));
    }

    #[test]
    fn test_explicit_overrides() {
        let config = config_from(&[
            ("WIKI_BIND_ADDRESS", "127.0.0.1:8080"),
            ("WIKI_PAGES_DIR", "/tmp/pages"),
            ("WIKI_STORE", "memory"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.pages_dir, PathBuf::from("/tmp/pages"));
    }

    #[test]
    fn test_database_url() {
        let config = config_from(&[
            ("WIKI_STORE", "sqlite"),
            ("WIKI_DATABASE_URL", "sqlite:///var/lib/wiki/pages.db"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("sqlite:///var/lib/wiki/pages.db")
        );

        let config = config_from(&[("WIKI_DATABASE_URL", "sqlite::memory:")]).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn test_rejects_remote_databases() {
        assert!(config_from(&[("WIKI_DATABASE_URL", "libsql://wiki.turso.io")]).is_err());
        assert!(config_from(&[("WIKI_DATABASE_URL", "postgres://localhost/wiki")]).is_err());
        assert!(config_from(&[("WIKI_DATABASE_AUTH_TOKEN", "secret")]).is_err());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("WIKI_STORE", "  ")]).unwrap();
        assert_eq!(config.store, StoreKind::File);
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("WIKI_STORE", "postgres")]).is_err());
        assert!(config_from(&[("WIKI_BIND_ADDRESS", "not-an-address")]).is_err());
    }
}
