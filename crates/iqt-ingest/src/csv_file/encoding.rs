//! Byte to text decoding for CSV exports.

use std::borrow::Cow;

use encoding_rs::UTF_8;

/// Decodes raw file bytes as text.
///
/// UTF-8 is assumed; a UTF-8 or UTF-16 byte order mark overrides that and is
/// removed. Malformed sequences become U+FFFD. The flag reports whether any
/// replacement happened.
pub fn decode_text(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    let (text, _encoding, had_errors) = UTF_8.decode(bytes);
    (text, had_errors)
}
