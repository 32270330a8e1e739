use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Field key for an entity's display name
pub const NAME: &str = "Name";
/// Field key for the detail page an entity was read from
pub const URL: &str = "Url";
/// Field key for the sampled color summary
pub const COLORS: &str = "Colors";
pub const DESCRIPTION: &str = "Description";
pub const LAST_UPDATED: &str = "LastUpdated";
pub const STARGAZERS: &str = "StarGazersCount";

/// One extracted entity, serialized as a flat string-keyed object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from already extracted fields
    pub fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set a field, replacing any earlier value under the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }
}

/// Output of processing a single page
#[derive(Debug, Default)]
pub struct PageResult {
    /// Records in the order they were discovered on the page
    pub records: Vec<Record>,

    /// Pagination link, at most one per page
    pub next: Option<Url>,

    /// Further listing pages discovered on a seed listing page
    pub sub_pages: Vec<Url>,
}

impl PageResult {
    /// A page that contributed nothing, e.g. because it could not be fetched
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Averaged color of one sampled image region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorToken {
    Rgb(u8, u8, u8),
    /// Sentinel used when the image could not be fetched or decoded
    Unknown,
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorToken::Rgb(r, g, b) => write!(f, "{},{},{}", r, g, b),
            ColorToken::Unknown => f.write_str("unknown"),
        }
    }
}

/// Join tokens into the space separated summary stored on a record
pub fn join_tokens(tokens: &[ColorToken]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
