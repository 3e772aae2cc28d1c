//! CSV reading utilities.

mod encoding;
mod header;
mod reader;

pub use encoding::decode_text;
pub use header::{DEFAULT_HEADER_BYTE_BUDGET, dedupe_headers, parse_header_line, read_csv_header};
pub use reader::{CsvTable, parse_csv_text, read_csv_table};
