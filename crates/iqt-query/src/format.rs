//! Readability formatting for query text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::lexer::{SegmentKind, split_segments};

static CLAUSE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*\b(LEFT\s+JOIN|RIGHT\s+JOIN|INNER\s+JOIN|ORDER\s+BY|GROUP\s+BY|SELECT|FROM|WHERE|AND|OR|HAVING|LIMIT|OFFSET|JOIN|ON)\b\s*",
    )
    .expect("Invalid clause keyword regex")
});

static COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*").expect("Invalid comma regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Puts each clause keyword on its own line in upper case and normalizes
/// comma spacing. Literals, quoted identifiers and comments are untouched.
pub fn format_query(query: &str) -> String {
    let formatted: String = split_segments(query)
        .into_iter()
        .map(|segment| match segment.kind {
            SegmentKind::Code => format_code(segment.text),
            SegmentKind::Quoted | SegmentKind::Comment => segment.text.to_string(),
        })
        .collect();
    formatted.trim().to_string()
}

fn format_code(code: &str) -> String {
    let with_breaks = CLAUSE_KEYWORD.replace_all(code, |caps: &Captures<'_>| {
        let keyword = WHITESPACE.replace_all(&caps[1], " ").to_uppercase();
        format!("\n{keyword} ")
    });
    COMMA.replace_all(&with_breaks, ", ").into_owned()
}
