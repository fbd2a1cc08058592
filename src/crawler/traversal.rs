//! Traversal controller - the recursive depth-bounded crawl
//!
//! This module owns the crawl algorithm:
//! - depth-bounded recursion with a shared visited set
//! - concurrent fan-out over discovered links with join semantics
//! - handing extracted, language-filtered content to storage and the
//!   aggregator
//!
//! A branch failure is counted and absorbed; nothing a child does can abort
//! its siblings or the crawl.

use crate::aggregate::Aggregator;
use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::session::{CrawlSession, StatsSnapshot};
use crate::extract::{extract_blocks, extract_links};
use crate::fingerprint::fingerprint;
use crate::lang::LanguageFilter;
use crate::storage::{MasterRecord, PageRecord, SqliteStorage, Storage};
use crate::ConfigError;
use chrono::Utc;
use futures::future::{join_all, BoxFuture};
use reqwest::Client;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Semaphore;
use url::Url;

/// Link discovery fires only when a node's `depth` parameter equals this
/// literal value - not when depth equals the crawl's configured starting
/// depth. Starting a crawl at any other depth therefore disables discovery
/// entirely. Deliberately a literal constant; see DESIGN.md before changing.
pub const LINK_DISCOVERY_DEPTH: u32 = 2;

/// Outcome of one root crawl
#[derive(Debug)]
pub struct CrawlReport {
    /// Final counter values
    pub stats: StatsSnapshot,

    /// The aggregated master record, absent if no page produced content
    pub master: Option<MasterRecord>,
}

/// The crawler for one configuration
///
/// Holds the pooled HTTP client, the storage handle, the fetch concurrency
/// limiter, and the language filter. One instance can run one root crawl at a
/// time; all per-crawl state lives in the `CrawlSession`.
pub struct Crawler {
    client: Client,
    storage: Arc<Mutex<SqliteStorage>>,
    limiter: Arc<Semaphore>,
    language: LanguageFilter,
}

impl Crawler {
    /// Creates a crawler from a validated configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `storage` - The storage backend shared with the aggregator
    pub fn new(config: &Config, storage: Arc<Mutex<SqliteStorage>>) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        let limiter = Arc::new(Semaphore::new(config.crawler.max_concurrent_fetches as usize));
        let language = LanguageFilter::from_code(&config.crawler.target_language)
            .ok_or_else(|| ConfigError::UnknownLanguage(config.crawler.target_language.clone()))?;

        Ok(Self {
            client,
            storage,
            limiter,
            language,
        })
    }

    /// Runs one root crawl to completion and returns the report
    ///
    /// # Arguments
    ///
    /// * `root_url` - The URL the crawl starts from
    /// * `depth` - The initial depth (the reference invocation uses 2)
    pub async fn run(&self, root_url: &str, depth: u32) -> crate::Result<CrawlReport> {
        tracing::info!("Starting crawl of {} at depth {}", root_url, depth);

        let session = CrawlSession::new();
        let (aggregator, merge_tx) =
            Aggregator::spawn(root_url.to_string(), self.storage.clone());

        self.visit(root_url.to_string(), depth, &session, &merge_tx)
            .await;

        // No branch holds a sender anymore; let the aggregator drain and stop
        drop(merge_tx);
        let master = aggregator.finish().await?;

        let stats = session.stats.snapshot();
        tracing::info!(
            "Crawl of {} finished: {} visited, {} saved, {} errors",
            root_url,
            session.visited_count(),
            stats.saved_count,
            stats.error_count
        );

        Ok(CrawlReport { stats, master })
    }

    /// Visits one URL and recurses over its discovered links
    ///
    /// Returns a boxed future because the recursion depth is only known at
    /// runtime. The future resolves once this node and its whole subtree are
    /// done.
    fn visit<'a>(
        &'a self,
        url: String,
        depth: u32,
        session: &'a CrawlSession,
        merges: &'a UnboundedSender<PageRecord>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            if depth == 0 {
                return;
            }

            // Claim the URL before fetching so concurrent siblings racing on
            // the same link cannot fetch it twice
            if !session.mark_visited(&url) {
                return;
            }

            let body = {
                // Permit is held across the fetch only
                let _permit = match self.limiter.acquire().await {
                    Ok(permit) => permit,
                    // The semaphore is never closed during a crawl
                    Err(_) => return,
                };

                match fetch_url(&self.client, &url).await {
                    FetchResult::Success { body, .. } => body,
                    FetchResult::HttpError { status_code } => {
                        tracing::warn!("Fetch of {} failed with HTTP {}", url, status_code);
                        session.stats.record_error();
                        return;
                    }
                    FetchResult::NetworkError { error } => {
                        tracing::warn!("Fetch of {} failed: {}", url, error);
                        session.stats.record_error();
                        return;
                    }
                }
            };

            // From here to the child fan-out nothing suspends: extraction,
            // classification, hashing, and persistence run to completion
            // before any sibling can observe their effects.
            let combined_content = extract_blocks(&body)
                .into_iter()
                .filter(|block| self.language.is_target(block))
                .collect::<Vec<_>>()
                .join("\n\n");

            if combined_content.trim().is_empty() {
                // Nothing to persist, but link discovery still proceeds
                tracing::debug!("No qualifying content on {}", url);
            } else {
                self.persist_page(&url, combined_content, session, merges);
            }

            let links = if depth == LINK_DISCOVERY_DEPTH {
                self.discover_links(&body, &url, session)
            } else {
                Vec::new()
            };

            if depth > 1 && !links.is_empty() {
                let children = links
                    .iter()
                    .map(|link| self.visit(link.clone(), depth - 1, session, merges));
                join_all(children).await;
            }

            // Counted once per discovering node, not per successful child
            if depth == LINK_DISCOVERY_DEPTH && !links.is_empty() {
                session.stats.record_fetched_sublinks(links.len() as u64);
            }
        })
    }

    /// Persists one page's content and queues it for aggregation
    ///
    /// A storage failure is logged and skips aggregation for this page; the
    /// crawl itself continues.
    fn persist_page(
        &self,
        url: &str,
        content: String,
        session: &CrawlSession,
        merges: &UnboundedSender<PageRecord>,
    ) {
        let content_hash = fingerprint(&content);
        let crawled_at = Utc::now().to_rfc3339();

        let inserted = {
            let mut storage = self.storage.lock().unwrap();
            storage.insert_web_content(url, &content, &content_hash, &crawled_at)
        };

        match inserted {
            Ok(id) => {
                session.stats.record_saved();
                tracing::info!("Stored content for {} in individual record", url);

                let page = PageRecord {
                    id,
                    url: url.to_string(),
                    content,
                    content_hash,
                    crawled_at,
                };
                // The aggregator outlives every traversal branch
                let _ = merges.send(page);
            }
            Err(e) => {
                tracing::error!("Failed to persist content for {}: {}", url, e);
            }
        }
    }

    /// Collects followable links from a page body
    ///
    /// Already-visited targets are skipped; every surviving link counts
    /// toward `total_sublinks`. Duplicate links within one page are kept
    /// (the visited set resolves them at visit time).
    fn discover_links(&self, body: &str, url: &str, session: &CrawlSession) -> Vec<String> {
        let base = match Url::parse(url) {
            Ok(base) => base,
            Err(e) => {
                tracing::debug!("Cannot resolve links against {}: {}", url, e);
                return Vec::new();
            }
        };

        let mut links = Vec::new();
        for link in extract_links(body, &base) {
            if session.is_visited(&link) {
                continue;
            }
            session.stats.record_sublink();
            links.push(link);
        }

        links
    }
}
