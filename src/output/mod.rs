//! Output module for crawl reporting
//!
//! This module handles:
//! - Printing the end-of-crawl statistics
//! - Summarizing what is stored in the database

pub mod stats;

pub use stats::{load_statistics, print_crawl_report, print_statistics, StoreStatistics};
