//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Sitefold database.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per successfully crawled page, append-only
CREATE TABLE IF NOT EXISTS web_content (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    content TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    last_crawled TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_web_content_url ON web_content(url);
CREATE INDEX IF NOT EXISTS idx_web_content_hash ON web_content(content_hash);

-- One row per root URL; updates overwrite the whole document
CREATE TABLE IF NOT EXISTS master_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    root_url TEXT NOT NULL UNIQUE,
    all_data TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    sublinks TEXT NOT NULL,
    last_updated TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// Safe to call on an already-initialized database.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
