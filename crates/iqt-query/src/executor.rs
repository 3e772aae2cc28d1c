//! Query execution against the current dataset.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use iqt_model::DatasetHandle;

use crate::engine::{DEFAULT_TABLE_NAME, SqlEngine, SqliteEngine};
use crate::error::{QueryError, Result};
use crate::result::QueryResult;
use crate::rewrite::rewrite_query;

/// A successful query and how long the engine took.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub result: QueryResult,
    pub elapsed: Duration,
    /// SQL as sent to the engine, after the attribute rewrite.
    pub rewritten: String,
}

/// Runs user queries against whatever dataset the handle currently holds.
///
/// The engine is built lazily and rebuilt whenever the handle's snapshot
/// changes, so a reload or reset is picked up by the next query.
pub struct QueryExecutor<E: SqlEngine = SqliteEngine> {
    handle: DatasetHandle,
    table: String,
    engine: Mutex<Option<E>>,
}

impl<E: SqlEngine> QueryExecutor<E> {
    pub fn new(handle: DatasetHandle) -> Self {
        Self::with_table_name(handle, DEFAULT_TABLE_NAME)
    }

    pub fn with_table_name(handle: DatasetHandle, table: impl Into<String>) -> Self {
        Self {
            handle,
            table: table.into(),
            engine: Mutex::new(None),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn handle(&self) -> &DatasetHandle {
        &self.handle
    }

    /// Rewrites and runs `query`.
    ///
    /// Engine errors are returned with the engine's message unchanged.
    pub fn execute(&self, query: &str) -> Result<QueryOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        let snapshot = self.handle.snapshot();
        if snapshot.is_empty() {
            return Err(QueryError::NoDataset);
        }

        let rewritten = rewrite_query(query);
        tracing::debug!(sql = %rewritten, "executing query");

        let mut guard = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        let stale = guard
            .as_ref()
            .is_none_or(|engine| !Arc::ptr_eq(engine.dataset(), &snapshot));
        if stale {
            let engine = E::load(Arc::clone(&snapshot), &self.table).map_err(QueryError::EngineLoad)?;
            *guard = Some(engine);
        }
        let Some(engine) = guard.as_ref() else {
            return Err(QueryError::NoDataset);
        };

        let start = Instant::now();
        let result = engine.run_sql(&rewritten).map_err(|err| {
            tracing::warn!(error = %err, "query failed");
            QueryError::Execution {
                message: err.to_string(),
            }
        })?;
        let elapsed = start.elapsed();

        tracing::info!(
            rows = result.len(),
            duration_ms = elapsed.as_millis(),
            "query complete"
        );
        Ok(QueryOutcome {
            result,
            elapsed,
            rewritten,
        })
    }
}
