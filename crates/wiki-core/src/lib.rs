//! Wiki - Core Library
//!
//! The page model, the storage backends a page can live in, and the
//! service that implements the page lifecycle on top of them.

pub mod error;
pub mod page;
pub mod service;
pub mod storage;

pub use error::*;
pub use page::*;
pub use service::PageService;
pub use storage::{FileStore, MemoryStore, PageStore, SqliteStore};
