use crate::crawlers::web::Fetcher;
use crate::error::ExtractError;
use crate::parsers::{extract, html};
use crate::results::{self, PageResult, Record, join_tokens};
use crate::sampler::{ImageSampler, Profile};
use url::Url;

/// What a page is expected to contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRole {
    /// Search results with one record per result and a `next` link
    SearchResults,
    /// Item listing; every item is resolved through its detail page
    Listing { discover_sub_pages: bool },
    /// A single item
    Detail,
}

/// Fetches one page and runs the extractors for its role
pub struct PageProcessor<'f, F> {
    fetcher: &'f F,
}

impl<'f, F: Fetcher> PageProcessor<'f, F> {
    pub fn new(fetcher: &'f F) -> Self {
        Self { fetcher }
    }

    /// Processes a page.
    ///
    /// Fetch failures are logged and yield an empty result. Only fatal
    /// extraction errors are returned.
    pub async fn process(&self, url: &Url, role: PageRole) -> Result<PageResult, ExtractError> {
        let Some(markup) = self.load(url).await else {
            return Ok(PageResult::empty());
        };

        match role {
            PageRole::SearchResults => {
                let doc = html::parse(&markup);
                let page = extract::search_page(&doc, url)?;
                ::log::info!("Found {} records in {}", page.records.len(), url);
                Ok(page)
            }
            PageRole::Listing { discover_sub_pages } => {
                let listing = {
                    let doc = html::parse(&markup);
                    extract::listing_page(&doc, url, discover_sub_pages)
                };
                ::log::info!(
                    "Found {} items and {} sub-pages in {}",
                    listing.items.len(),
                    listing.sub_pages.len(),
                    url
                );

                let mut records = Vec::with_capacity(listing.items.len());
                for item in listing.items {
                    let detail = Box::pin(self.process(&item.url, PageRole::Detail)).await?;
                    let Some(mut record) = detail.records.into_iter().next() else {
                        continue;
                    };
                    record.set(results::NAME, item.name);
                    records.push(record);
                }

                Ok(PageResult {
                    records,
                    next: listing.next,
                    sub_pages: listing.sub_pages,
                })
            }
            PageRole::Detail => Ok(PageResult {
                records: vec![self.detail_record(url, &markup).await],
                ..PageResult::empty()
            }),
        }
    }

    /// Builds the record of a single item from its detail page
    async fn detail_record(&self, url: &Url, markup: &str) -> Record {
        let detail = {
            let doc = html::parse(markup);
            extract::detail_page(&doc)
        };

        let mut record = Record::from_fields(detail.fields);

        if let Some(image) = detail.image.and_then(|href| extract::resolve(url, &href)) {
            let profile = Profile::for_url(url.as_str());
            let tokens = ImageSampler::new(self.fetcher)
                .sample(image.as_str(), profile)
                .await;
            record.set(results::COLORS, join_tokens(&tokens));
        } else {
            ::log::debug!("No image reference on {}", url);
        }

        record.set(results::URL, url.as_str());
        record
    }

    async fn load(&self, url: &Url) -> Option<String> {
        ::log::info!("Processing {}", url);
        match self.fetcher.fetch_page(url.as_str()).await {
            Ok(markup) => Some(markup),
            Err(e) => {
                ::log::error!("Failed to fetch {}: {}", url, e);
                None
            }
        }
    }
}
