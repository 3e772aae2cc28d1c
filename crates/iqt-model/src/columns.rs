//! Reserved column names added by the pipeline.

/// Column carrying the stable zero-based row identifier.
pub const ROW_INDEX_COLUMN: &str = "_rowIndex";

/// Column carrying the parsed attribute mapping (serialized as JSON in the engine).
pub const ATTRIBUTES_COLUMN: &str = "_attributes";

/// All internal column names, in the order they are appended to the engine table.
pub const INTERNAL_COLUMNS: [&str; 2] = [ROW_INDEX_COLUMN, ATTRIBUTES_COLUMN];

/// Returns true for pipeline-owned columns.
///
/// The comparison ignores ASCII case because the engine resolves identifiers
/// case-insensitively, so `_ROWINDEX` in a result set is the same column.
pub fn is_internal_column(name: &str) -> bool {
    INTERNAL_COLUMNS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}
