use crate::error::FetchError;
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;

/// Retrieves pages and raw resources over the network.
///
/// Failures are reported as-is; callers decide whether they are fatal.
/// No retry is attempted.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Fetches a page's markup
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// Fetches a raw resource such as an image
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Plain HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        ::log::debug!("GET {}", url);
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        ::log::debug!("GET {} (raw)", url);
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }
}

/// Renders pages through a WebDriver session.
///
/// Raw resources are not rendered and go through the inner HTTP fetcher.
pub struct WebDriverFetcher {
    client: Client,
    http: HttpFetcher,
}

impl WebDriverFetcher {
    /// Connects to the WebDriver instance
    pub async fn connect(endpoint: &str, http: HttpFetcher) -> Result<Self, FetchError> {
        let client = ClientBuilder::native()
            .connect(endpoint)
            .await
            .map_err(|source| FetchError::Session {
                endpoint: endpoint.to_string(),
                source,
            })?;

        ::log::debug!("Connected to WebDriver at {}", endpoint);
        Ok(Self { client, http })
    }

    /// Ends the WebDriver session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }

    fn navigation_error(url: &str, source: fantoccini::error::CmdError) -> FetchError {
        FetchError::WebDriver {
            url: url.to_string(),
            source,
        }
    }
}

impl Fetcher for WebDriverFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        ::log::debug!("SCRAPE: {}", url);
        self.client
            .goto(url)
            .await
            .map_err(|e| Self::navigation_error(url, e))?;
        self.client
            .source()
            .await
            .map_err(|e| Self::navigation_error(url, e))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.http.fetch_bytes(url).await
    }
}
