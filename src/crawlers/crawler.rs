use crate::crawlers::page::{PageProcessor, PageRole};
use crate::crawlers::web::Fetcher;
use crate::error::CrawlError;
use crate::results::Record;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Extraction job run over the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Paginated search results, one record per result
    Search,
    /// Category listing whose items are read from their detail pages
    Listing,
}

/// Pages still to be processed, in discovery order.
///
/// A URL is only ever queued once per run, fragments ignored.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    seen: HashSet<String>,
}

impl Frontier {
    pub fn new(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Queues a URL, returning `false` if it was already seen
    pub fn push(&mut self, url: Url) -> bool {
        let mut key = url.clone();
        key.set_fragment(None);

        if !self.seen.insert(key.to_string()) {
            ::log::debug!("Skipping already queued link: {}", url);
            return false;
        }

        ::log::debug!("Queuing link for crawling: {}", url);
        self.queue.push_back(url);
        true
    }

    pub fn pop(&mut self) -> Option<Url> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Drives the page processor across the frontier
pub struct Crawler<'f, F> {
    processor: PageProcessor<'f, F>,
    max_pages: usize,
}

impl<'f, F: Fetcher> Crawler<'f, F> {
    pub fn new(fetcher: &'f F, max_pages: usize) -> Self {
        Self {
            processor: PageProcessor::new(fetcher),
            max_pages,
        }
    }

    /// Crawls from `seed` until the frontier is exhausted or `max_pages`
    /// pages have been processed.
    ///
    /// Records come back in discovery order. A malformed timestamp aborts the
    /// crawl; every other failure only costs the affected page.
    pub async fn crawl(&self, seed: Url, job: Job) -> Result<Vec<Record>, CrawlError> {
        ::log::info!("Starting {:?} crawl for: {}", job, seed);

        let mut frontier = Frontier::new(seed);
        let mut records = Vec::new();
        let mut processed = 0;

        while processed < self.max_pages {
            let Some(url) = frontier.pop() else {
                break;
            };

            let role = match job {
                Job::Search => PageRole::SearchResults,
                Job::Listing => PageRole::Listing {
                    discover_sub_pages: processed == 0,
                },
            };

            let page = self.processor.process(&url, role).await?;
            processed += 1;

            records.extend(page.records);
            for sub_page in page.sub_pages {
                frontier.push(sub_page);
            }
            if let Some(next) = page.next {
                frontier.push(next);
            }
        }

        if !frontier.is_empty() {
            ::log::info!(
                "Page limit of {} reached with {} pages left unvisited",
                self.max_pages,
                frontier.len()
            );
        }

        ::log::info!(
            "Crawling complete - {} records from {} pages",
            records.len(),
            processed
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawlers::web::memory::MemoryFetcher;
    use crate::results;
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn endless_pages(url: &str) -> Option<String> {
        let n: u32 = url.rsplit("/p").next()?.parse().ok()?;
        Some(format!(
            r#"<a class="v-align-middle" href="/repo/{n}">repo/{n}</a>
               <a rel="next" href="/p{next}">next</a>"#,
            n = n,
            next = n + 1
        ))
    }

    fn red_png() -> Vec<u8> {
        let image = RgbaImage::from_pixel(600, 400, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    fn detail(brand: &str, image: &str) -> String {
        format!(
            r#"<html><head><meta property="og:image" content="{image}"></head>
<body><div class="the_content_wrapper"><h1>x</h1><p>Brand: {brand} | Size: 15ml</p></div></body></html>"#
        )
    }

    #[test]
    fn test_frontier_deduplicates() {
        let seed = Url::parse("http://example.com/cat/").unwrap();
        let mut frontier = Frontier::new(seed.clone());

        assert!(!frontier.push(seed));
        assert!(!frontier.push(Url::parse("http://example.com/cat/#top").unwrap()));
        assert!(frontier.push(Url::parse("http://example.com/cat/?page=2").unwrap()));
        assert_eq!(frontier.len(), 2);

        assert_eq!(frontier.pop().unwrap().as_str(), "http://example.com/cat/");
        assert_eq!(
            frontier.pop().unwrap().as_str(),
            "http://example.com/cat/?page=2"
        );
        assert!(frontier.pop().is_none());
    }

    #[tokio::test]
    async fn test_crawl_respects_max_pages() {
        let fetcher = MemoryFetcher::new().with_generator(endless_pages);
        let seed = Url::parse("http://example.com/p1").unwrap();

        let records = Crawler::new(&fetcher, 5)
            .crawl(seed, Job::Search)
            .await
            .unwrap();

        assert_eq!(fetcher.requested().len(), 5);
        assert_eq!(
            fetcher.requested().last().map(String::as_str),
            Some("http://example.com/p5")
        );
        let names: Vec<&str> = records
            .iter()
            .filter_map(|r| r.get(results::NAME))
            .collect();
        assert_eq!(names, vec!["repo/1", "repo/2", "repo/3", "repo/4", "repo/5"]);
    }

    #[tokio::test]
    async fn test_crawl_stops_when_frontier_is_exhausted() {
        let fetcher = MemoryFetcher::new().with_page(
            "http://example.com/only",
            r#"<a class="v-align-middle" href="/a/b">a/b</a>"#,
        );
        let seed = Url::parse("http://example.com/only").unwrap();

        let records = Crawler::new(&fetcher, 5)
            .crawl(seed, Job::Search)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(fetcher.requested(), vec!["http://example.com/only"]);
    }

    #[tokio::test]
    async fn test_unreachable_seed_yields_no_records() {
        let fetcher = MemoryFetcher::new();
        let seed = Url::parse("http://example.com/down").unwrap();

        let records = Crawler::new(&fetcher, 5)
            .crawl(seed, Job::Listing)
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_timestamp_aborts_crawl() {
        let fetcher = MemoryFetcher::new().with_page(
            "http://example.com/p1",
            r#"<a class="v-align-middle" href="/a/b">a/b</a>
               <p class="text-gray">Updated <relative-time datetime="not-a-date">?</relative-time></p>
               <a rel="next" href="/p2">next</a>"#,
        );
        let seed = Url::parse("http://example.com/p1").unwrap();

        let result = Crawler::new(&fetcher, 5).crawl(seed, Job::Search).await;
        assert!(matches!(result, Err(CrawlError::Extract(_))));
        assert_eq!(fetcher.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_crawl_end_to_end() {
        let seed_url = "http://shop.test/category/wc15ml/";
        let fetcher = MemoryFetcher::new()
            .with_page(
                seed_url,
                r#"<html><body>
<h2 class="post_title"><a href="/product/ultramarine-blue">Ultramarine Blue 15ml Tube</a></h2>
<h2 class="post_title"><a href="/product/hansa-yellow">Hansa Yellow 15ml</a></h2>
<a class="page" href="/category/wc15ml/page/2/">2</a>
</body></html>"#,
            )
            .with_page(
                "http://shop.test/category/wc15ml/page/2/",
                "<html><body><p>No more products</p></body></html>",
            )
            .with_page(
                "http://shop.test/product/ultramarine-blue",
                &detail("Acme", "http://shop.test/img/ub.png"),
            )
            .with_page(
                "http://shop.test/product/hansa-yellow",
                &detail("Other", "/img/missing.png"),
            )
            .with_bytes("http://shop.test/img/ub.png", &red_png());
        let seed = Url::parse(seed_url).unwrap();

        let records = Crawler::new(&fetcher, 100)
            .crawl(seed, Job::Listing)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.get(results::NAME), Some("Ultramarine Blue"));
        assert_eq!(
            first.get(results::URL),
            Some("http://shop.test/product/ultramarine-blue")
        );
        assert_eq!(first.get("Brand"), Some("Acme"));
        assert_eq!(first.get("Size"), Some("15ml"));
        assert_eq!(
            first.get(results::COLORS),
            Some(vec!["255,0,0"; 6].join(" ").as_str())
        );

        let second = &records[1];
        assert_eq!(second.get(results::NAME), Some("Hansa Yellow"));
        assert_eq!(
            second.get(results::URL),
            Some("http://shop.test/product/hansa-yellow")
        );
        assert_eq!(second.get(results::COLORS), Some("unknown"));

        assert_eq!(
            fetcher.requested(),
            vec![
                "http://shop.test/category/wc15ml/",
                "http://shop.test/product/ultramarine-blue",
                "http://shop.test/product/hansa-yellow",
                "http://shop.test/category/wc15ml/page/2/",
            ]
        );
    }

    #[tokio::test]
    async fn test_sub_pages_are_processed_in_discovery_order() {
        let fetcher = MemoryFetcher::new()
            .with_page(
                "http://shop.test/cat/",
                r#"<a class="page" href="/cat/2/">2</a>
                   <a class="page" href="/cat/3/">3</a>
                   <a rel="next" href="/cat/2/">next</a>"#,
            )
            .with_page(
                "http://shop.test/cat/2/",
                r#"<h2 class="post_title"><a href="/item/two">Two</a></h2>
                   <a class="page" href="/cat/9/">9</a>"#,
            )
            .with_page(
                "http://shop.test/cat/3/",
                r#"<h2 class="post_title"><a href="/item/three">Three</a></h2>"#,
            )
            .with_page("http://shop.test/item/two", "<p>two</p>")
            .with_page("http://shop.test/item/three", "<p>three</p>");
        let seed = Url::parse("http://shop.test/cat/").unwrap();

        let records = Crawler::new(&fetcher, 10)
            .crawl(seed, Job::Listing)
            .await
            .unwrap();

        let names: Vec<&str> = records
            .iter()
            .filter_map(|r| r.get(results::NAME))
            .collect();
        assert_eq!(names, vec!["Two", "Three"]);
        // sub-page links are only honored on the seed page
        assert!(
            !fetcher
                .requested()
                .contains(&"http://shop.test/cat/9/".to_string())
        );
    }

    #[tokio::test]
    async fn test_listing_next_links_respect_max_pages() {
        let fetcher = MemoryFetcher::new()
            .with_page(
                "http://shop.test/cat/",
                r#"<h2 class="post_title"><a href="/item/one">One 15ml</a></h2>
                   <a rel="next" href="/cat/2/">next</a>"#,
            )
            .with_page(
                "http://shop.test/cat/2/",
                r#"<h2 class="post_title"><a href="/item/two">Two 15ml</a></h2>
                   <h2 class="post_title"><a href="/item/three">Three 15ml</a></h2>
                   <a rel="next" href="/cat/3/">next</a>"#,
            )
            .with_page(
                "http://shop.test/cat/3/",
                r#"<h2 class="post_title"><a href="/item/four">Four 15ml</a></h2>"#,
            )
            .with_page("http://shop.test/item/one", "<p>one</p>")
            .with_page("http://shop.test/item/two", "<p>two</p>")
            .with_page("http://shop.test/item/three", "<p>three</p>")
            .with_page("http://shop.test/item/four", "<p>four</p>");
        let seed = Url::parse("http://shop.test/cat/").unwrap();

        let records = Crawler::new(&fetcher, 2)
            .crawl(seed, Job::Listing)
            .await
            .unwrap();

        let names: Vec<&str> = records
            .iter()
            .filter_map(|r| r.get(results::NAME))
            .collect();
        assert_eq!(names, vec!["One", "Two", "Three"]);

        let requested = fetcher.requested();
        assert!(requested.contains(&"http://shop.test/cat/2/".to_string()));
        assert!(!requested.contains(&"http://shop.test/cat/3/".to_string()));
        assert!(!requested.contains(&"http://shop.test/item/four".to_string()));
    }
}
