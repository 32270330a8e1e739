use thiserror::Error;

/// Failure to retrieve a page or a raw resource.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to open a webdriver session at {endpoint}: {source}")]
    Session {
        endpoint: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    #[error("webdriver could not load {url}: {source}")]
    WebDriver {
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },
}

/// Extraction failures that abort the whole run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed timestamp {value:?}: {source}")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Image enrichment failures. These never leave the sampler.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed url {url:?}: {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
