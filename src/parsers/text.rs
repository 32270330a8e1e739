use regex::Regex;
use std::collections::BTreeMap;
use std::num::ParseIntError;
use std::sync::LazyLock;

/// Size suffix on product names, e.g. " 200ml Tube"
static SIZE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s) [0-9]+(?:ml|oz).*").expect("size suffix pattern is valid"));

/// Separator between the first two metadata lines of a key:value block
const BLOCK_SEPARATOR: &str = " | ";

/// Separator between a metadata key and its value
const PAIR_SEPARATOR: &str = ": ";

/// Fragment shared by "License" and "license" notices
const LICENSE_MARKER: &str = "icense";

/// Strips a trailing size/quantity suffix from an entity name.
///
/// `"Ultramarine Blue 200ml Tube"` becomes `"Ultramarine Blue"`. Names without
/// a suffix come back unchanged apart from trailing whitespace.
pub fn normalize_name(raw: &str) -> String {
    SIZE_SUFFIX.replacen(raw, 1, "").trim_end().to_string()
}

/// Parses a "key: value" metadata block.
///
/// The first `" | "` separates the first two lines, every other line is already
/// on its own row. Lines that do not split into exactly one key and one value
/// are dropped.
pub fn split_key_values(text: &str) -> BTreeMap<String, String> {
    let lines = text.replacen(BLOCK_SEPARATOR, "\n", 1);

    let mut pairs = BTreeMap::new();
    for line in lines.split('\n') {
        let parts: Vec<&str> = line.trim().split(PAIR_SEPARATOR).collect();
        if let [key, value] = parts.as_slice() {
            pairs.insert(key.to_string(), value.to_string());
        } else if !line.trim().is_empty() {
            ::log::trace!("Discarding metadata line {:?}", line.trim());
        }
    }

    pairs
}

/// Parses a popularity counter such as `"1,234"`
pub fn parse_count(text: &str) -> Result<u64, ParseIntError> {
    text.trim().replace(',', "").parse()
}

/// Whether a paragraph is a license notice rather than a description
pub fn is_license_notice(text: &str) -> bool {
    text.contains(LICENSE_MARKER)
}
