pub mod config;
pub mod crawlers;
pub mod error;
pub mod parsers;
pub mod results;
pub mod sampler;

// Re-export commonly used types for convenience
pub use config::{CrawlKind, HarvestConfig};
pub use error::{CrawlError, ExtractError, FetchError};
pub use results::{ColorToken, PageResult, Record};

use crawlers::{Crawler, HttpFetcher, WebDriverFetcher};
use std::time::Duration;
use url::Url;

/// Main builder for a harvest run
pub struct Harvest {
    config: HarvestConfig,
}

impl Harvest {
    /// Create a new Harvest from a configuration
    pub fn new(config: HarvestConfig) -> Self {
        Self { config }
    }

    /// Create a Harvest for a seed URL with default settings
    pub fn from_seed(seed_url: &str) -> Self {
        Self::new(HarvestConfig::new(seed_url))
    }

    /// Set the extraction job
    pub fn with_kind(mut self, kind: CrawlKind) -> Self {
        self.config.kind = kind;
        self
    }

    /// Set the maximum number of pages to process
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = Some(max_pages);
        self
    }

    /// Load configuration from a file, keeping the seed URL
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = HarvestConfig::from_file(path)?;
        config.seed_url = self.config.seed_url;
        Ok(Self::new(config))
    }

    /// Crawl from the seed and return the records in discovery order
    pub async fn run(self) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
        let seed = Url::parse(&self.config.seed_url).map_err(|source| CrawlError::InvalidSeed {
            url: self.config.seed_url.clone(),
            source,
        })?;

        let job = self.config.kind.resolve(&seed);
        let max_pages = self.config.max_pages_for(job);
        let http = HttpFetcher::new(
            &self.config.user_agent,
            Duration::from_secs(self.config.timeout_secs),
        )?;

        match self.config.webdriver_endpoint() {
            Some(endpoint) => {
                ::log::info!("Rendering pages through WebDriver at {}", endpoint);
                let fetcher = WebDriverFetcher::connect(&endpoint, http).await?;
                let result = Crawler::new(&fetcher, max_pages).crawl(seed, job).await;
                fetcher.close().await;
                Ok(result?)
            }
            None => Ok(Crawler::new(&http, max_pages).crawl(seed, job).await?),
        }
    }
}
