//! Master record aggregation
//!
//! Every page that produces content is folded into a single master record per
//! root crawl. Merges are serialized through one aggregator task that owns the
//! record and receives persisted pages over a channel, so no two merges can
//! interleave and each merge (including its persistence) completes before the
//! next begins.

use crate::storage::{
    MasterRecord, PageRecord, SqliteStorage, Storage, StorageResult, SublinkEntry,
};
use crate::SitefoldError;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

/// What a merge did to the master record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No master record existed; this page created it
    Created,

    /// The page's content hash differed from the record's; content appended
    Appended,

    /// The page's content hash matched the record's; nothing changed
    Unchanged,
}

/// Merges a persisted page into the master record, creating it if absent
///
/// On creation the record's merged content is exactly the page content and the
/// page becomes the first sublink. On append, the page content is added after
/// a blank line, a sublink is appended, and the record adopts the page's
/// content hash. A page whose hash equals the record's current hash is a
/// no-op. Every mutation is persisted before returning.
///
/// # Arguments
///
/// * `storage` - The storage backend to persist through
/// * `master` - The master record slot for this crawl (absent before the
///   first successful page)
/// * `root_url` - The root URL of the crawl, used when creating the record
/// * `page` - The page to merge
pub fn merge(
    storage: &mut dyn Storage,
    master: &mut Option<MasterRecord>,
    root_url: &str,
    page: &PageRecord,
) -> StorageResult<MergeOutcome> {
    match master {
        None => {
            let mut record = MasterRecord {
                id: 0,
                root_url: root_url.to_string(),
                merged_content: page.content.clone(),
                content_hash: page.content_hash.clone(),
                sublinks: vec![SublinkEntry::from_page(page)],
                last_updated: Utc::now().to_rfc3339(),
            };
            record.id = storage.insert_master_record(&record)?;
            *master = Some(record);
            Ok(MergeOutcome::Created)
        }
        Some(record) if page.content_hash != record.content_hash => {
            record.merged_content.push_str("\n\n");
            record.merged_content.push_str(&page.content);
            record.sublinks.push(SublinkEntry::from_page(page));
            record.content_hash = page.content_hash.clone();
            record.last_updated = Utc::now().to_rfc3339();
            storage.update_master_record(record)?;
            Ok(MergeOutcome::Appended)
        }
        Some(_) => Ok(MergeOutcome::Unchanged),
    }
}

/// Handle to the running aggregator task
pub struct Aggregator {
    handle: JoinHandle<Option<MasterRecord>>,
}

impl Aggregator {
    /// Spawns the aggregator task for one root crawl
    ///
    /// Returns the handle and the channel on which traversal branches send
    /// persisted pages. The task merges pages strictly in arrival order and
    /// exits once every sender has been dropped.
    pub fn spawn(
        root_url: String,
        storage: Arc<Mutex<SqliteStorage>>,
    ) -> (Self, UnboundedSender<PageRecord>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<PageRecord>();

        let handle = tokio::spawn(async move {
            let mut master: Option<MasterRecord> = None;

            while let Some(page) = rx.recv().await {
                let outcome = {
                    let mut storage = storage.lock().unwrap();
                    merge(&mut *storage, &mut master, &root_url, &page)
                };

                match outcome {
                    Ok(MergeOutcome::Created) => {
                        tracing::info!("Created master record with content for {}", page.url);
                    }
                    Ok(MergeOutcome::Appended) => {
                        tracing::info!("Updated master record with new content for {}", page.url);
                    }
                    Ok(MergeOutcome::Unchanged) => {
                        tracing::info!("No new content for: {}", page.url);
                    }
                    Err(e) => {
                        tracing::error!("Failed to merge {} into master record: {}", page.url, e);
                    }
                }
            }

            master
        });

        (Self { handle }, tx)
    }

    /// Waits for the aggregator to drain and returns the final master record
    ///
    /// Callers must drop every sender clone first, or this will wait forever.
    pub async fn finish(self) -> crate::Result<Option<MasterRecord>> {
        self.handle
            .await
            .map_err(|e| SitefoldError::Aggregator(e.to_string()))
    }
}
