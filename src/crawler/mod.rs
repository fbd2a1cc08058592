//! Crawler module for web page fetching and traversal
//!
//! This module contains the core crawling logic:
//! - HTTP fetching over one pooled client
//! - Recursive depth-bounded traversal with visited-set dedup
//! - Concurrent fan-out over discovered links
//! - Crawl-wide statistics

mod fetcher;
mod session;
mod traversal;

pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use session::{CrawlSession, CrawlStats, StatsSnapshot};
pub use traversal::{CrawlReport, Crawler, LINK_DISCOVERY_DEPTH};

use crate::config::Config;
use crate::storage::SqliteStorage;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Runs a complete crawl for a configuration
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the storage database
/// 2. Build the HTTP client and language filter
/// 3. Traverse from the configured root URL to the configured depth
/// 4. Fold page content into the master record
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Final statistics and the master record, if any
/// * `Err(SitefoldError)` - Setup failed (the crawl itself never aborts)
pub async fn crawl(config: Config) -> crate::Result<CrawlReport> {
    let storage = Arc::new(Mutex::new(SqliteStorage::new(Path::new(
        &config.output.database_path,
    ))?));
    let crawler = Crawler::new(&config, storage)?;
    crawler
        .run(&config.crawler.root_url, config.crawler.depth)
        .await
}
