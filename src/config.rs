use crate::crawlers::Job;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use url::Url;

/// Host whose pages are read as search results when the kind is `auto`
const SEARCH_HOST: &str = "github.com";

/// Which extraction job to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlKind {
    /// Decide from the seed URL's host
    #[default]
    Auto,
    /// Paginated repository search results
    Search,
    /// Product listing with per-item detail pages
    Listing,
}

impl CrawlKind {
    /// Resolves the job to run for `seed`
    pub fn resolve(self, seed: &Url) -> Job {
        match self {
            CrawlKind::Search => Job::Search,
            CrawlKind::Listing => Job::Listing,
            CrawlKind::Auto => {
                if seed.host_str().is_some_and(|host| host.ends_with(SEARCH_HOST)) {
                    Job::Search
                } else {
                    Job::Listing
                }
            }
        }
    }
}

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// URL to start crawling from
    #[serde(default)]
    pub seed_url: String,

    #[serde(default)]
    pub kind: CrawlKind,

    /// Maximum number of pages to process (defaults depend on the job)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,

    /// URL for a WebDriver instance; pages are fetched over plain HTTP if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webdriver_url: Option<String>,

    /// User agent sent with every HTTP request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Default page limit for search crawls
fn default_search_pages() -> usize {
    5
}

/// Default page limit for listing crawls
fn default_listing_pages() -> usize {
    100
}

/// Default value for user_agent
fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Default value for timeout_secs
fn default_timeout_secs() -> u64 {
    30
}

impl HarvestConfig {
    /// Create a new configuration with default values
    pub fn new(seed_url: &str) -> Self {
        Self {
            seed_url: seed_url.to_string(),
            kind: CrawlKind::default(),
            max_pages: None,
            webdriver_url: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Page limit for the given job
    pub fn max_pages_for(&self, job: Job) -> usize {
        self.max_pages.unwrap_or_else(|| match job {
            Job::Search => default_search_pages(),
            Job::Listing => default_listing_pages(),
        })
    }

    /// WebDriver endpoint, with the WEBDRIVER_URL environment variable taking precedence
    pub fn webdriver_endpoint(&self) -> Option<String> {
        match std::env::var("WEBDRIVER_URL") {
            Ok(url) if !url.is_empty() => Some(url),
            _ => self.webdriver_url.clone(),
        }
    }
}
