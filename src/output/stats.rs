//! Statistics reporting
//!
//! Two views: the in-memory counters of the crawl that just ran, and a
//! summary of what the database holds (used by the `--stats` CLI mode).

use crate::crawler::CrawlReport;
use crate::storage::Storage;
use crate::SitefoldError;

/// Summary of the stored crawl data
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Number of page content rows
    pub pages_stored: u64,

    /// Number of master records
    pub master_records: u64,

    /// Sublink entries across all master records
    pub merged_sublinks: u64,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(SitefoldError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<StoreStatistics, SitefoldError> {
    Ok(StoreStatistics {
        pages_stored: storage.count_web_content()?,
        master_records: storage.count_master_records()?,
        merged_sublinks: storage.count_master_sublinks()?,
    })
}

/// Prints stored-data statistics to stdout
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Stored Crawl Data ===\n");
    println!("Pages stored: {}", stats.pages_stored);
    println!("Master records: {}", stats.master_records);
    println!("Merged sublinks: {}", stats.merged_sublinks);
}

/// Prints the end-of-crawl report to stdout
pub fn print_crawl_report(report: &CrawlReport) {
    let stats = &report.stats;

    println!("\nTotal number of sublinks: {}", stats.total_sublinks);
    println!("Number of sublinks fetched: {}", stats.fetched_sublinks);
    println!("Number of URLs that caused errors: {}", stats.error_count);
    println!("Number of URLs saved to the database: {}", stats.saved_count);

    match &report.master {
        Some(master) => {
            println!(
                "Master record for {}: {} sublinks, last updated {}",
                master.root_url,
                master.sublinks.len(),
                master.last_updated
            );
        }
        None => println!("No master record was created (no page produced content)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{SqliteStorage, Storage};

    #[test]
    fn test_load_statistics_empty_store() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let stats = load_statistics(&storage).unwrap();
        assert_eq!(stats.pages_stored, 0);
        assert_eq!(stats.master_records, 0);
        assert_eq!(stats.merged_sublinks, 0);
    }

    #[test]
    fn test_load_statistics_counts_pages() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .insert_web_content("https://example.com/", "text", "hash", "t")
            .unwrap();
        let stats = load_statistics(&storage).unwrap();
        assert_eq!(stats.pages_stored, 1);
    }
}
