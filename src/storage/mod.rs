//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler:
//! - SQLite database initialization and schema management
//! - Append-only page content records (`web_content`)
//! - Master record persistence (`master_records`, one row per root URL,
//!   full-document overwrite on update)

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use serde::{Deserialize, Serialize};

use crate::SitefoldError;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(SitefoldError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SitefoldError> {
    SqliteStorage::new(path)
}

/// One successfully crawled page, as persisted to `web_content`
///
/// Immutable after creation; the id is assigned by the insert.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: i64,
    pub url: String,
    pub content: String,
    pub content_hash: String,
    pub crawled_at: String,
}

/// One contributing page embedded in a master record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SublinkEntry {
    pub page_record_id: i64,
    pub url: String,
    pub content: String,
    pub content_hash: String,
}

impl SublinkEntry {
    pub fn from_page(page: &PageRecord) -> Self {
        Self {
            page_record_id: page.id,
            url: page.url.clone(),
            content: page.content.clone(),
            content_hash: page.content_hash.clone(),
        }
    }
}

/// The single aggregated document for one root URL
///
/// `content_hash` tracks the hash of the most recently merged page's content,
/// not a hash of `merged_content` as a whole. That is what makes a repeat of
/// the last page's content a detectable no-op.
#[derive(Debug, Clone)]
pub struct MasterRecord {
    pub id: i64,
    pub root_url: String,
    pub merged_content: String,
    pub content_hash: String,
    pub sublinks: Vec<SublinkEntry>,
    pub last_updated: String,
}
