//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{MasterRecord, PageRecord, SublinkEntry};
use crate::SitefoldError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SitefoldError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SitefoldError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, SitefoldError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn row_to_page(row: &rusqlite::Row<'_>) -> rusqlite::Result<PageRecord> {
        Ok(PageRecord {
            id: row.get(0)?,
            url: row.get(1)?,
            content: row.get(2)?,
            content_hash: row.get(3)?,
            crawled_at: row.get(4)?,
        })
    }
}

impl Storage for SqliteStorage {
    // ===== Page Content =====

    fn insert_web_content(
        &mut self,
        url: &str,
        content: &str,
        content_hash: &str,
        crawled_at: &str,
    ) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO web_content (url, content, content_hash, last_crawled)
             VALUES (?1, ?2, ?3, ?4)",
            params![url, content, content_hash, crawled_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_web_content(&self, id: i64) -> StorageResult<PageRecord> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, content, content_hash, last_crawled
             FROM web_content WHERE id = ?1",
        )?;

        stmt.query_row(params![id], Self::row_to_page)
            .map_err(|_| StorageError::PageNotFound(id))
    }

    fn get_web_content_by_url(&self, url: &str) -> StorageResult<Option<PageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, content, content_hash, last_crawled
             FROM web_content WHERE url = ?1 ORDER BY id DESC LIMIT 1",
        )?;

        Ok(stmt
            .query_row(params![url], Self::row_to_page)
            .optional()?)
    }

    fn count_web_content(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM web_content", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Master Records =====

    fn insert_master_record(&mut self, record: &MasterRecord) -> StorageResult<i64> {
        let sublinks_json = serde_json::to_string(&record.sublinks)?;
        self.conn.execute(
            "INSERT INTO master_records (root_url, all_data, content_hash, sublinks, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.root_url,
                record.merged_content,
                record.content_hash,
                sublinks_json,
                record.last_updated
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_master_record(&mut self, record: &MasterRecord) -> StorageResult<()> {
        // Full-document overwrite, never a partial patch
        let sublinks_json = serde_json::to_string(&record.sublinks)?;
        let updated = self.conn.execute(
            "UPDATE master_records
             SET root_url = ?1, all_data = ?2, content_hash = ?3, sublinks = ?4, last_updated = ?5
             WHERE id = ?6",
            params![
                record.root_url,
                record.merged_content,
                record.content_hash,
                sublinks_json,
                record.last_updated,
                record.id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::MasterNotFound(record.root_url.clone()));
        }

        Ok(())
    }

    fn get_master_record(&self, root_url: &str) -> StorageResult<Option<MasterRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, root_url, all_data, content_hash, sublinks, last_updated
             FROM master_records WHERE root_url = ?1",
        )?;

        let row = stmt
            .query_row(params![root_url], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .optional()?;

        match row {
            Some((id, root_url, merged_content, content_hash, sublinks_json, last_updated)) => {
                let sublinks: Vec<SublinkEntry> = serde_json::from_str(&sublinks_json)?;
                Ok(Some(MasterRecord {
                    id,
                    root_url,
                    merged_content,
                    content_hash,
                    sublinks,
                    last_updated,
                }))
            }
            None => Ok(None),
        }
    }

    fn count_master_records(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM master_records", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_master_sublinks(&self) -> StorageResult<u64> {
        let mut stmt = self
            .conn
            .prepare("SELECT sublinks FROM master_records")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut total = 0u64;
        for sublinks_json in rows {
            let sublinks: Vec<SublinkEntry> = serde_json::from_str(&sublinks_json?)?;
            total += sublinks.len() as u64;
        }
        Ok(total)
    }
}
