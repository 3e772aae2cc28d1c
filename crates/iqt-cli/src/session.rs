//! State shared by one CLI invocation or shell session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use iqt_ingest::MergeProgress;
use iqt_model::{Dataset, DatasetHandle, DatasetStats};
use iqt_query::{
    Page, Pagination, QueryError, QueryExecutor, QueryOutcome, RowDetail,
    default_export_file_name, export_csv,
};

use crate::config::Settings;
use crate::pipeline::{LoadReport, load_dataset};

/// The loaded dataset, the last query result and the reader's page position.
pub struct Session {
    settings: Settings,
    handle: DatasetHandle,
    executor: QueryExecutor,
    last: Option<QueryOutcome>,
    pager: Pagination,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let handle = DatasetHandle::new();
        let executor =
            QueryExecutor::with_table_name(handle.clone(), settings.query.table_name.clone());
        let pager = Pagination::new(settings.query.page_size);
        Self {
            settings,
            handle,
            executor,
            last: None,
            pager,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        self.handle.snapshot()
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_loaded()
    }

    pub fn stats(&self) -> Option<DatasetStats> {
        self.is_loaded().then(|| self.dataset().stats())
    }

    /// Loads `inputs`, replacing the current dataset and clearing results.
    ///
    /// On failure the previous dataset stays active.
    pub fn load<F>(&mut self, inputs: &[PathBuf], on_progress: F) -> Result<LoadReport>
    where
        F: FnMut(MergeProgress<'_>),
    {
        let (dataset, report) =
            load_dataset(inputs, self.settings.ingest.header_byte_budget, on_progress)?;
        self.handle.replace(dataset);
        self.clear_results();
        Ok(report)
    }

    /// Drops the dataset and every result derived from it.
    pub fn reset(&mut self) {
        self.handle.reset();
        self.clear_results();
        tracing::info!("dataset reset");
    }

    fn clear_results(&mut self) {
        self.last = None;
        self.pager.reset();
    }

    /// Runs `sql` and makes its result current, starting at page 1.
    ///
    /// A failed query leaves the previous result and page in place.
    pub fn run_query(&mut self, sql: &str) -> Result<&QueryOutcome, QueryError> {
        let outcome = self.executor.execute(sql)?;
        self.pager.reset();
        Ok(self.last.insert(outcome))
    }

    pub fn last_outcome(&self) -> Option<&QueryOutcome> {
        self.last.as_ref()
    }

    pub fn current_page(&self) -> Option<Page<'_>> {
        let outcome = self.last.as_ref()?;
        Some(outcome.result.page(self.pager.page(), self.pager.page_size()))
    }

    pub fn next_page(&mut self) -> Option<Page<'_>> {
        let len = self.last.as_ref()?.result.len();
        self.pager.next(len);
        self.current_page()
    }

    pub fn prev_page(&mut self) -> Option<Page<'_>> {
        let len = self.last.as_ref()?.result.len();
        self.pager.prev(len);
        self.current_page()
    }

    /// Moves to a 1-based page, clamped to the available pages.
    pub fn go_to_page(&mut self, page: usize) -> Option<Page<'_>> {
        let len = self.last.as_ref()?.result.len();
        self.pager.go_to(page, len);
        self.current_page()
    }

    /// Detail of the 1-based result row `number`.
    pub fn row_detail(&self, number: usize) -> Option<RowDetail> {
        let outcome = self.last.as_ref()?;
        let index = number.checked_sub(1)?;
        RowDetail::from_result(&outcome.result, index, &self.dataset())
    }

    /// Exports the current result. Without a path the dated default name is
    /// used in the working directory.
    pub fn export(&self, path: Option<&Path>) -> Result<(PathBuf, usize), QueryError> {
        let outcome = self.last.as_ref().ok_or(QueryError::NothingToExport)?;
        let path = path.map_or_else(
            || PathBuf::from(default_export_file_name(chrono::Local::now().date_naive())),
            Path::to_path_buf,
        );
        let rows = export_csv(&outcome.result, &path)?;
        Ok((path, rows))
    }
}
