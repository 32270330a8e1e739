pub mod crawler;
pub mod page;
pub mod web;

pub use crawler::{Crawler, Frontier, Job};
pub use page::{PageProcessor, PageRole};
pub use web::{Fetcher, HttpFetcher, WebDriverFetcher};
