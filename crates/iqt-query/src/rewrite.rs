//! Attribute call rewriting.
//!
//! Users write `ATTR('key')` as if attributes were a column of the current
//! row. The engine function needs the row explicitly, so every such call in
//! code position becomes `ATTR(_rowIndex, 'key')`.

use std::sync::LazyLock;

use regex::Regex;

use iqt_model::ROW_INDEX_COLUMN;

use crate::lexer::opaque_prefix;

/// Name of the attribute lookup function registered with the engine.
pub const ATTR_FUNCTION: &str = "ATTR";

/// `ATTR ( 'key' )`, anchored at the scan position.
static ATTR_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^ATTR\s*\(\s*'([^']+)'\s*\)").expect("Invalid attribute call regex")
});

/// Rewrites single-argument attribute calls to their row-aware form.
///
/// Calls inside string literals, quoted identifiers and comments are left
/// alone. Everything else is preserved byte for byte. Already rewritten calls
/// no longer match, so applying this twice equals applying it once.
pub fn rewrite_query(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 16);
    let mut pos = 0;
    let mut after_word = false;

    while pos < query.len() {
        let rest = &query[pos..];

        if let Some((_, len)) = opaque_prefix(rest) {
            out.push_str(&rest[..len]);
            pos += len;
            after_word = false;
            continue;
        }

        if !after_word && let Some(caps) = ATTR_CALL.captures(rest) {
            let (Some(call), Some(key)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            out.push_str(&format!(
                "{ATTR_FUNCTION}({ROW_INDEX_COLUMN}, '{}')",
                key.as_str()
            ));
            pos += call.end();
            after_word = false;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        out.push(ch);
        pos += ch.len_utf8();
        after_word = is_word_char(ch);
    }

    out
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}
