//! Field extractors.
//!
//! Every extractor inspects a single node (reading its subtree or trailing
//! sibling where needed) and yields at most one field value. Page visitors run
//! them in a fixed priority order while the tree is walked and thread the
//! record under construction explicitly.

use crate::error::ExtractError;
use crate::parsers::html::{attribute, inner_text, is_element, root, text_of};
use crate::parsers::text::{is_license_notice, normalize_name, parse_count, split_key_values};
use crate::parsers::tree::{self, TreeNode};
use crate::results::{self, PageResult, Record};
use chrono::{DateTime, SecondsFormat, Utc};
use scraper::Html;
use std::collections::BTreeMap;
use url::Url;

const REPOSITORY_LINK_CLASS: &str = "v-align-middle";
const SUMMARY_CLASS_MARKER: &str = "text-gray";
const UPDATED_MARKER: &str = "Updated";
const STAR_LABEL: &str = "star";
const NEXT_RELATION: &str = "next";
const SUB_PAGE_CLASS: &str = "page";
const LISTING_ITEM_CLASS: &str = "post_title";
const CONTENT_WRAPPER_CLASS: &str = "the_content_wrapper";
const SOCIAL_IMAGE_PROPERTY: &str = "og:image";

/// Resolves a possibly relative href against the page it was found on
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    match base.join(href) {
        Ok(url) => Some(url),
        Err(e) => {
            ::log::warn!("Unexpected URL parse error for {:?} on {}: {}", href, base, e);
            None
        }
    }
}

fn has_class(node: TreeNode<'_>, class: &str) -> bool {
    attribute(node, "class") == Some(class)
}

//
// Search result extractors
//

/// Repository name from a result link whose text mirrors its href
pub fn repository_name(node: TreeNode<'_>) -> Option<String> {
    if !is_element(node, "a") || !has_class(node, REPOSITORY_LINK_CLASS) {
        return None;
    }

    let Some(text) = node.first_child().and_then(text_of) else {
        ::log::warn!("Repository link without a leading text node");
        return None;
    };

    let href = attribute(node, "href").unwrap_or_default();
    if href.strip_prefix('/') != Some(text) {
        ::log::warn!("Repository link text {:?} does not match {:?}", text, href);
        return None;
    }

    Some(normalize_name(text))
}

/// Trimmed text of a grey summary paragraph
fn summary_text(node: TreeNode<'_>) -> Option<String> {
    if !is_element(node, "p") {
        return None;
    }

    let class = attribute(node, "class")?;
    if !class.contains(SUMMARY_CLASS_MARKER) {
        return None;
    }

    Some(inner_text(node).trim().to_string())
}

/// Last update instant of an "Updated ..." summary paragraph.
///
/// The timestamp is read from the first descendant carrying a `datetime`
/// attribute. A missing or malformed timestamp is an error.
pub fn last_updated(node: TreeNode<'_>) -> Result<Option<DateTime<Utc>>, ExtractError> {
    match summary_text(node) {
        Some(text) if text.contains(UPDATED_MARKER) => {}
        _ => return Ok(None),
    }

    let stamp = tree::find(node, |current| attribute(current, "datetime").is_some())
        .and_then(|current| attribute(current, "datetime"))
        .unwrap_or_default();

    DateTime::parse_from_rfc3339(stamp)
        .map(|instant| Some(instant.with_timezone(&Utc)))
        .map_err(|source| ExtractError::MalformedTimestamp {
            value: stamp.to_string(),
            source,
        })
}

/// Free text description, skipping update lines and license notices
pub fn description(node: TreeNode<'_>) -> Option<String> {
    let text = summary_text(node)?;
    if text.is_empty() || text.contains(UPDATED_MARKER) || is_license_notice(&text) {
        return None;
    }
    Some(text)
}

/// Star count read from the sibling that trails the star icon
pub fn star_count(node: TreeNode<'_>) -> Option<u64> {
    if !is_element(node, "svg") || attribute(node, "aria-label") != Some(STAR_LABEL) {
        return None;
    }

    let trailing = node.next_sibling().map(inner_text).unwrap_or_default();
    match parse_count(&trailing) {
        Ok(count) => Some(count),
        Err(e) => {
            ::log::warn!("Unexpected stargazer count {:?}: {}", trailing.trim(), e);
            None
        }
    }
}

/// Pagination link carrying `rel="next"`
pub fn next_link(node: TreeNode<'_>, base: &Url) -> Option<Url> {
    if !is_element(node, "a") {
        return None;
    }

    let relation = attribute(node, "rel")?;
    if !relation.split_whitespace().any(|token| token == NEXT_RELATION) {
        return None;
    }

    resolve(base, attribute(node, "href")?)
}

/// Accumulates repository records while a search results page is walked
pub struct SearchPageVisitor<'u> {
    base: &'u Url,
    records: Vec<Record>,
    current: Option<Record>,
    next: Option<Url>,
}

impl<'u> SearchPageVisitor<'u> {
    pub fn new(base: &'u Url) -> Self {
        Self {
            base,
            records: Vec::new(),
            current: None,
            next: None,
        }
    }

    /// Applies the search extractors to one node, in priority order
    pub fn visit(&mut self, node: TreeNode<'_>) -> Result<(), ExtractError> {
        if let Some(name) = repository_name(node) {
            self.flush();
            let mut record = Record::new();
            record.set(results::NAME, name);
            self.current = Some(record);
        }

        if let Some(updated) = last_updated(node)? {
            self.attach(
                results::LAST_UPDATED,
                updated.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        } else if let Some(text) = description(node) {
            match self.current.as_mut() {
                Some(record) if !record.contains(results::DESCRIPTION) => {
                    record.set(results::DESCRIPTION, text)
                }
                Some(_) => ::log::trace!("Ignoring further description {:?}", text),
                None => ::log::debug!("Description found before any repository name"),
            }
        }

        if let Some(count) = star_count(node) {
            self.attach(results::STARGAZERS, count.to_string());
        }

        if self.next.is_none() {
            self.next = next_link(node, self.base);
        }

        Ok(())
    }

    fn attach(&mut self, key: &str, value: String) {
        match self.current.as_mut() {
            Some(record) => record.set(key, value),
            None => ::log::debug!("{} found before any repository name", key),
        }
    }

    fn flush(&mut self) {
        if let Some(record) = self.current.take() {
            self.records.push(record);
        }
    }

    pub fn finish(mut self) -> PageResult {
        self.flush();
        PageResult {
            records: self.records,
            next: self.next,
            sub_pages: Vec::new(),
        }
    }
}

/// Extracts every repository record from a search results page
pub fn search_page(doc: &Html, base: &Url) -> Result<PageResult, ExtractError> {
    let mut visitor = SearchPageVisitor::new(base);
    let mut failure = None;

    tree::walk(root(doc), &mut |node| match visitor.visit(node) {
        Ok(()) => false,
        Err(e) => {
            failure = Some(e);
            true
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(visitor.finish()),
    }
}

//
// Listing extractors
//

/// An item found on a listing page, not yet enriched from its detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub name: String,
    pub url: Url,
}

/// Everything a listing page contributes before any detail page is fetched
#[derive(Debug, Default)]
pub struct ListingPage {
    pub items: Vec<ListingItem>,
    pub sub_pages: Vec<Url>,
    pub next: Option<Url>,
}

/// Link to a further listing page of the same category
pub fn sub_page_link(node: TreeNode<'_>, base: &Url) -> Option<Url> {
    if !has_class(node, SUB_PAGE_CLASS) {
        return None;
    }
    resolve(base, attribute(node, "href")?)
}

/// Item title block, read through its first link
pub fn listing_item(node: TreeNode<'_>, base: &Url) -> Option<ListingItem> {
    if !has_class(node, LISTING_ITEM_CLASS) {
        return None;
    }

    let Some(link) = tree::find(node, |current| {
        is_element(current, "a") && attribute(current, "href").is_some()
    }) else {
        ::log::warn!("Item title without a link");
        return None;
    };

    let url = resolve(base, attribute(link, "href")?)?;
    ::log::debug!("Got item url {}", url);

    Some(ListingItem {
        name: normalize_name(inner_text(link).trim_start()),
        url,
    })
}

struct ListingPageVisitor<'u> {
    base: &'u Url,
    discover_sub_pages: bool,
    page: ListingPage,
}

impl ListingPageVisitor<'_> {
    fn visit(&mut self, node: TreeNode<'_>) {
        if self.discover_sub_pages {
            if let Some(url) = sub_page_link(node, self.base) {
                self.page.sub_pages.push(url);
            }
        }

        if let Some(item) = listing_item(node, self.base) {
            self.page.items.push(item);
        }

        if self.page.next.is_none() {
            self.page.next = next_link(node, self.base);
        }
    }
}

/// Extracts items and follow-up links from a listing page.
///
/// Sub-page links are only collected when `discover_sub_pages` is set, which
/// the crawl does for the seed page.
pub fn listing_page(doc: &Html, base: &Url, discover_sub_pages: bool) -> ListingPage {
    let mut visitor = ListingPageVisitor {
        base,
        discover_sub_pages,
        page: ListingPage::default(),
    };

    tree::walk(root(doc), &mut |node| {
        visitor.visit(node);
        false
    });

    visitor.page
}

//
// Detail page extractors
//

/// Fields read from an item's detail page
#[derive(Debug, Default)]
pub struct DetailPage {
    pub fields: BTreeMap<String, String>,
    pub image: Option<String>,
}

/// Parses the "key: value" block inside the content wrapper.
///
/// The block is the first paragraph of the wrapper, or the wrapper itself when
/// it has no paragraph.
pub fn key_value_block(start: TreeNode<'_>) -> Option<BTreeMap<String, String>> {
    let wrapper = tree::find(start, |node| has_class(node, CONTENT_WRAPPER_CLASS))?;
    let block = tree::find(wrapper, |node| is_element(node, "p")).unwrap_or(wrapper);
    Some(split_key_values(&inner_text(block)))
}

/// Social preview image declared in a `meta` tag
pub fn image_reference(start: TreeNode<'_>) -> Option<String> {
    tree::find(start, |node| {
        is_element(node, "meta") && attribute(node, "property") == Some(SOCIAL_IMAGE_PROPERTY)
    })
    .and_then(|node| attribute(node, "content"))
    .filter(|content| !content.trim().is_empty())
    .map(str::to_string)
}

pub fn detail_page(doc: &Html) -> DetailPage {
    let fields = key_value_block(root(doc)).unwrap_or_else(|| {
        ::log::warn!("Detail page has no content block");
        BTreeMap::new()
    });

    DetailPage {
        fields,
        image: image_reference(root(doc)),
    }
}
