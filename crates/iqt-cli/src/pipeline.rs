//! Load pipeline: discover, validate, merge, enrich.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use iqt_ingest::{
    ExcludedFile, MergeProgress, MergedFile, PendingFileSet, expand_inputs,
    merge_files_with_progress,
};
use iqt_model::{Dataset, DatasetStats, FileValidation, ValidationSummary};
use iqt_transform::build_dataset;

/// Header validation for a batch of inputs.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub files: Vec<FileValidation>,
    pub summary: ValidationSummary,
}

/// What happened during a load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub validation: ValidationReport,
    pub merged: Vec<MergedFile>,
    pub excluded: Vec<ExcludedFile>,
    pub stats: DatasetStats,
    pub attribute_column: Option<String>,
}

/// Expands directories and queues CSV inputs, dropping duplicates.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<PendingFileSet> {
    let files = expand_inputs(inputs).context("resolve input files")?;
    let mut pending = PendingFileSet::new();
    let added = pending.extend(&files).context("queue input files")?;
    if added < files.len() {
        warn!(
            skipped = files.len() - added,
            "ignored duplicate files with the same name and size"
        );
    }
    if pending.is_empty() {
        bail!("no CSV files found in the given inputs");
    }
    Ok(pending)
}

/// Reads each queued file's header and compares it to the first file's.
pub fn validate_inputs(pending: &PendingFileSet, header_byte_budget: usize) -> ValidationReport {
    let files = pending.validate(header_byte_budget);
    let summary = ValidationSummary::from_results(&files);
    ValidationReport { files, summary }
}

/// Runs the full load and returns the new dataset.
///
/// Validation is reported but does not decide membership; the merge applies
/// the same header rule against the fully parsed files.
pub fn load_dataset<F>(
    inputs: &[PathBuf],
    header_byte_budget: usize,
    on_progress: F,
) -> Result<(Dataset, LoadReport)>
where
    F: FnMut(MergeProgress<'_>),
{
    let span = info_span!("load", inputs = inputs.len());
    let _guard = span.enter();
    let start = Instant::now();

    let pending = collect_inputs(inputs)?;
    let validation = validate_inputs(&pending, header_byte_budget);
    if !validation.summary.can_process() {
        bail!(
            "none of the {} files can be merged; check that the first file is readable",
            validation.summary.total
        );
    }

    let paths = pending.paths();
    let outcome = merge_files_with_progress(&paths, on_progress).context("merge files")?;
    let sources: Vec<PathBuf> = outcome.merged.iter().map(|file| file.path.clone()).collect();
    let dataset = build_dataset(outcome.columns, outcome.records).with_sources(sources);
    let stats = dataset.stats();

    info!(
        records = stats.records,
        columns = stats.columns,
        attributes = stats.attributes,
        files = outcome.merged.len(),
        excluded = outcome.excluded.len(),
        duration_ms = start.elapsed().as_millis(),
        "dataset loaded"
    );

    let report = LoadReport {
        validation,
        merged: outcome.merged,
        excluded: outcome.excluded,
        stats,
        attribute_column: dataset.attribute_column().map(str::to_string),
    };
    Ok((dataset, report))
}

/// Display name for a path: the file name when there is one.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
