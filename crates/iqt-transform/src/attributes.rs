//! Participant attribute string parsing.
//!
//! Interaction exports carry participant data as one text cell of the form
//! `key:value; key:value`. Each segment may be prefixed by a generated
//! identifier (`3f2a9c1e-0b7d-...-key:value`), which is dropped.

use std::sync::LazyLock;

use regex::Regex;

use iqt_model::AttributeMap;

/// Identifier prefix (hex digits and hyphens), then `key:value`.
/// The key runs to the last colon of the segment.
static PREFIXED_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-f0-9-]+-(.+):(.*)$").expect("Invalid prefixed attribute regex")
});

/// Parses an attribute string into a key/value mapping.
///
/// Segments are separated by `;`. Segments without a colon or with an empty
/// key are skipped. Keys and values are trimmed; a later segment overwrites an
/// earlier one with the same key. Never fails.
pub fn parse_attributes(input: &str) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    if input.is_empty() {
        return attributes;
    }

    for segment in input.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some((key, value)) = split_segment(segment) {
            attributes.insert(key.to_string(), value.to_string());
        }
    }
    attributes
}

fn split_segment(segment: &str) -> Option<(&str, &str)> {
    let (key, value) = match PREFIXED_SEGMENT.captures(segment) {
        Some(caps) => {
            let key = caps.get(1)?.as_str();
            let value = caps.get(2).map_or("", |m| m.as_str());
            (key, value)
        }
        None => segment.split_once(':')?,
    };

    let key = key.trim();
    (!key.is_empty()).then(|| (key, value.trim()))
}
