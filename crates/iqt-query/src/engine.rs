//! Relational engine over a loaded dataset.
//!
//! The dataset is copied into an in-memory SQLite table. User columns are
//! stored as TEXT in header order, followed by the row index and the
//! attribute mapping serialized as JSON. The connection is switched to
//! read-only once the table is populated.

use std::sync::Arc;
use std::time::Instant;

use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, params_from_iter};

use iqt_model::{ATTRIBUTES_COLUMN, AttributeMap, Dataset, ROW_INDEX_COLUMN, is_internal_column};

use crate::error::EngineError;
use crate::result::{CellValue, QueryResult};
use crate::rewrite::ATTR_FUNCTION;

/// Default name of the table queries run against.
pub const DEFAULT_TABLE_NAME: &str = "interactions";

/// A SQL engine bound to one dataset snapshot.
pub trait SqlEngine: Sized {
    /// Builds an engine holding `dataset` as `table`.
    fn load(dataset: Arc<Dataset>, table: &str) -> Result<Self, EngineError>;

    /// The snapshot this engine was built from.
    fn dataset(&self) -> &Arc<Dataset>;

    /// Runs SQL that has already been through the attribute rewrite.
    fn run_sql(&self, sql: &str) -> Result<QueryResult, EngineError>;
}

/// SQLite-backed engine.
pub struct SqliteEngine {
    conn: Connection,
    dataset: Arc<Dataset>,
}

impl std::fmt::Debug for SqliteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteEngine")
            .field("rows", &self.dataset.len())
            .finish_non_exhaustive()
    }
}

impl SqlEngine for SqliteEngine {
    fn load(dataset: Arc<Dataset>, table: &str) -> Result<Self, EngineError> {
        let start = Instant::now();
        if let Some(column) = dataset.columns().iter().find(|c| is_internal_column(c)) {
            return Err(EngineError::ReservedColumn {
                column: column.clone(),
            });
        }

        let mut conn = Connection::open_in_memory()?;
        register_attr_function(&conn, Arc::clone(&dataset))?;
        populate_table(&mut conn, &dataset, table)?;
        conn.execute_batch("PRAGMA query_only = ON;")?;

        tracing::debug!(
            table,
            rows = dataset.len(),
            columns = dataset.columns().len(),
            duration_ms = start.elapsed().as_millis(),
            "query engine loaded"
        );
        Ok(Self { conn, dataset })
    }

    fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    fn run_sql(&self, sql: &str) -> Result<QueryResult, EngineError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
                let value: Value = row.get(idx)?;
                cells.push(CellValue::from(value));
            }
            rows.push(cells);
        }
        Ok(QueryResult::new(columns, rows))
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn populate_table(conn: &mut Connection, dataset: &Dataset, table: &str) -> Result<(), EngineError> {
    let mut definitions: Vec<String> = dataset
        .columns()
        .iter()
        .map(|name| format!("{} TEXT", quote_identifier(name)))
        .collect();
    definitions.push(format!("{} INTEGER", quote_identifier(ROW_INDEX_COLUMN)));
    definitions.push(format!("{} TEXT", quote_identifier(ATTRIBUTES_COLUMN)));

    let table = quote_identifier(table);
    conn.execute_batch(&format!(
        "CREATE TABLE {table} ({});",
        definitions.join(", ")
    ))?;

    let placeholders = vec!["?"; definitions.len()].join(", ");
    let insert = format!("INSERT INTO {table} VALUES ({placeholders})");

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&insert)?;
        for record in dataset.records() {
            let mut values: Vec<Value> = dataset
                .columns()
                .iter()
                .map(|column| Value::Text(record.value(column).to_string()))
                .collect();
            values.push(Value::Integer(record.row_index as i64));
            values.push(Value::Text(serde_json::to_string(&record.attributes)?));
            stmt.execute(params_from_iter(values))?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Registers `ATTR(row, key)` and a one-argument `ATTR(key)` that explains
/// why it cannot be evaluated.
///
/// The first argument of the two-argument form is either a row index into the
/// dataset or the JSON attribute map of a row. Unknown rows, NULL and missing
/// keys all yield an empty string.
fn register_attr_function(conn: &Connection, dataset: Arc<Dataset>) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function(ATTR_FUNCTION, 2, flags, move |ctx| {
        let Some(key) = ctx.get::<Option<String>>(1)? else {
            return Ok(String::new());
        };
        Ok(lookup_attribute(ctx, &dataset, &key))
    })?;

    conn.create_scalar_function(ATTR_FUNCTION, 1, flags, |_ctx| -> rusqlite::Result<String> {
        Err(rusqlite::Error::UserFunctionError(
            format!(
                "{ATTR_FUNCTION}(key) needs row context; write the key as a quoted literal, \
                 e.g. {ATTR_FUNCTION}('status')"
            )
            .into(),
        ))
    })?;
    Ok(())
}

fn lookup_attribute(ctx: &Context<'_>, dataset: &Dataset, key: &str) -> String {
    match ctx.get_raw(0) {
        ValueRef::Integer(row) => usize::try_from(row)
            .map(|row| dataset.attribute(row, key).to_string())
            .unwrap_or_default(),
        ValueRef::Text(json) => serde_json::from_slice::<AttributeMap>(json)
            .ok()
            .and_then(|mut attributes| attributes.remove(key))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iqt_model::{EnrichedRecord, RawRecord};
    use std::collections::BTreeSet;

    fn dataset() -> Arc<Dataset> {
        let columns = vec!["Queue".to_string(), "Agent".to_string()];
        let records = vec![
            EnrichedRecord {
                row_index: 0,
                values: RawRecord::from_cells(&columns, &["Support", "ann"]),
                attributes: [("status".to_string(), "active".to_string())].into(),
            },
            EnrichedRecord {
                row_index: 1,
                values: RawRecord::from_cells(&columns, &["Sales", "bob"]),
                attributes: AttributeMap::new(),
            },
        ];
        let keys = BTreeSet::from(["status".to_string()]);
        Arc::new(Dataset::new(columns, records, keys))
    }

    fn engine() -> SqliteEngine {
        SqliteEngine::load(dataset(), DEFAULT_TABLE_NAME).unwrap()
    }

    #[test]
    fn select_all_includes_internal_columns() {
        let result = engine().run_sql("SELECT * FROM interactions").unwrap();
        assert_eq!(
            result.columns(),
            &["Queue", "Agent", "_rowIndex", "_attributes"]
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result.rows()[1][2], CellValue::Integer(1));
    }

    #[test]
    fn attr_by_row_index() {
        let result = engine()
            .run_sql("SELECT Agent, ATTR(_rowIndex, 'status') AS s FROM interactions ORDER BY _rowIndex")
            .unwrap();
        assert_eq!(result.rows()[0][1], CellValue::Text("active".into()));
        assert_eq!(result.rows()[1][1], CellValue::Text(String::new()));
    }

    #[test]
    fn attr_by_json_map() {
        let result = engine()
            .run_sql("SELECT ATTR(_attributes, 'status') FROM interactions WHERE _rowIndex = 0")
            .unwrap();
        assert_eq!(result.rows()[0][0], CellValue::Text("active".into()));
    }

    #[test]
    fn attr_with_null_or_unknown_row_is_empty() {
        let result = engine()
            .run_sql("SELECT ATTR(NULL, 'status'), ATTR(99, 'status'), ATTR(-1, 'status')")
            .unwrap();
        assert!(
            result.rows()[0]
                .iter()
                .all(|cell| *cell == CellValue::Text(String::new()))
        );
    }

    #[test]
    fn single_argument_attr_fails_with_hint() {
        let err = engine().run_sql("SELECT ATTR('status')").unwrap_err();
        assert!(err.to_string().contains("needs row context"));
    }

    #[test]
    fn connection_is_read_only() {
        assert!(engine().run_sql("DELETE FROM interactions").is_err());
    }

    #[test]
    fn reserved_column_is_rejected() {
        let columns = vec!["_ROWINDEX".to_string()];
        let dataset = Arc::new(Dataset::new(columns, Vec::new(), BTreeSet::new()));
        let err = SqliteEngine::load(dataset, DEFAULT_TABLE_NAME).unwrap_err();
        assert!(matches!(err, EngineError::ReservedColumn { .. }));
    }

    #[test]
    fn quoted_column_names() {
        let columns = vec!["Queue \"Name\"".to_string()];
        let records = vec![EnrichedRecord {
            row_index: 0,
            values: RawRecord::from_cells(&columns, &["x"]),
            attributes: AttributeMap::new(),
        }];
        let dataset = Arc::new(Dataset::new(columns, records, BTreeSet::new()));
        let engine = SqliteEngine::load(dataset, DEFAULT_TABLE_NAME).unwrap();
        let result = engine
            .run_sql("SELECT \"Queue \"\"Name\"\"\" FROM interactions")
            .unwrap();
        assert_eq!(result.rows()[0][0], CellValue::Text("x".into()));
    }
}
