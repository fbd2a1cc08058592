//! Sitefold: a depth-bounded site text aggregator
//!
//! This crate implements a web crawler that follows links to a bounded depth,
//! extracts page text in a target language, deduplicates content by hash, and
//! folds everything under a root URL into a single merged master record.

pub mod aggregate;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod fingerprint;
pub mod lang;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Sitefold operations
#[derive(Debug, Error)]
pub enum SitefoldError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Aggregator task failed: {0}")]
    Aggregator(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),
}

/// Result type alias for Sitefold operations
pub type Result<T> = std::result::Result<T, SitefoldError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use aggregate::{merge, MergeOutcome};
pub use config::Config;
pub use crawler::{crawl, CrawlReport, CrawlSession, CrawlStats};
pub use fingerprint::fingerprint;
pub use storage::{MasterRecord, PageRecord, SublinkEntry};
