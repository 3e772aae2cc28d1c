//! Minimal SQL scanning: separates code from quoted text and comments.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentKind {
    Code,
    /// String literal or quoted identifier (`'..'`, `".."`, `[..]`, `` `..` ``).
    Quoted,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
}

/// If `rest` starts a quoted region or comment, returns its kind and byte length.
///
/// Unterminated regions extend to the end of the text.
pub(crate) fn opaque_prefix(rest: &str) -> Option<(SegmentKind, usize)> {
    let first = rest.chars().next()?;
    match first {
        '\'' | '"' | '`' => Some((SegmentKind::Quoted, delimited_len(rest, first, true))),
        '[' => Some((SegmentKind::Quoted, delimited_len(rest, ']', false))),
        '-' if rest.starts_with("--") => {
            let len = rest.find('\n').map_or(rest.len(), |idx| idx + 1);
            Some((SegmentKind::Comment, len))
        }
        '/' if rest.starts_with("/*") => {
            let len = rest[2..].find("*/").map_or(rest.len(), |idx| idx + 4);
            Some((SegmentKind::Comment, len))
        }
        _ => None,
    }
}

/// Length of a region opened by the first char of `text` and closed by `close`.
/// With `doubled_escape`, two consecutive closing chars stand for one literal char.
fn delimited_len(text: &str, close: char, doubled_escape: bool) -> usize {
    let mut chars = text.char_indices().skip(1).peekable();
    while let Some((idx, ch)) = chars.next() {
        if ch != close {
            continue;
        }
        if doubled_escape && matches!(chars.peek(), Some((_, next)) if *next == close) {
            chars.next();
            continue;
        }
        return idx + ch.len_utf8();
    }
    text.len()
}

/// Splits SQL text into code, quoted and comment segments.
pub(crate) fn split_segments(sql: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut code_start = 0;
    let mut pos = 0;

    while pos < sql.len() {
        let rest = &sql[pos..];
        if let Some((kind, len)) = opaque_prefix(rest) {
            if code_start < pos {
                segments.push(Segment {
                    kind: SegmentKind::Code,
                    text: &sql[code_start..pos],
                });
            }
            segments.push(Segment {
                kind,
                text: &rest[..len],
            });
            pos += len;
            code_start = pos;
        } else {
            pos += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    if code_start < sql.len() {
        segments.push(Segment {
            kind: SegmentKind::Code,
            text: &sql[code_start..],
        });
    }
    segments
}
