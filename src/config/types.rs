use serde::Deserialize;

/// Main configuration structure for Sitefold
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Root URL the crawl starts from
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Initial crawl depth (the reference invocation uses 2)
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrent-fetches", default = "default_concurrency")]
    pub max_concurrent_fetches: u32,

    /// ISO 639-3 code of the language to keep (e.g. "eng")
    #[serde(rename = "target-language", default = "default_language")]
    pub target_language: String,
}

fn default_depth() -> u32 {
    2
}

fn default_concurrency() -> u32 {
    16
}

fn default_language() -> String {
    "eng".to_string()
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}
