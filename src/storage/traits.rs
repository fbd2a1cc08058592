//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{MasterRecord, PageRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Master record not found for root URL: {0}")]
    MasterNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// `web_content` is append-only; master records are keyed by root URL with
/// full-document overwrite semantics on update.
pub trait Storage {
    // ===== Page Content =====

    /// Inserts a page content row and returns the new row id
    fn insert_web_content(
        &mut self,
        url: &str,
        content: &str,
        content_hash: &str,
        crawled_at: &str,
    ) -> StorageResult<i64>;

    /// Gets a page content row by id
    fn get_web_content(&self, id: i64) -> StorageResult<PageRecord>;

    /// Gets the most recently crawled row for a URL, if any
    fn get_web_content_by_url(&self, url: &str) -> StorageResult<Option<PageRecord>>;

    /// Counts all stored page content rows
    fn count_web_content(&self) -> StorageResult<u64>;

    // ===== Master Records =====

    /// Inserts a new master record and returns the new row id
    fn insert_master_record(&mut self, record: &MasterRecord) -> StorageResult<i64>;

    /// Overwrites an existing master record in full
    fn update_master_record(&mut self, record: &MasterRecord) -> StorageResult<()>;

    /// Gets the master record for a root URL, if any
    fn get_master_record(&self, root_url: &str) -> StorageResult<Option<MasterRecord>>;

    /// Counts master record rows
    fn count_master_records(&self) -> StorageResult<u64>;

    /// Counts sublink entries across all master records
    fn count_master_sublinks(&self) -> StorageResult<u64>;
}
