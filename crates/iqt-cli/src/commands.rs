use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info_span;

use iqt_cli::config::Settings;
use iqt_cli::pipeline::{collect_inputs, validate_inputs};
use iqt_cli::progress::MergeProgressBar;
use iqt_cli::session::Session;
use iqt_cli::shell;
use iqt_cli::summary::{load_summary_lines, schema_table, validation_table, write_result_page};
use iqt_query::{CellValue, QueryOutcome, export_csv, write_csv};

use crate::cli::{InputArgs, OutputArg, QueryArgs, QueryOptions, SchemaArgs, ShellArgs};

/// Validates headers and prints one line per file. Returns whether the batch
/// can be processed.
pub fn run_validate(args: &InputArgs, settings: &Settings) -> Result<bool> {
    let pending = collect_inputs(&args.files)?;
    let report = validate_inputs(&pending, settings.ingest.header_byte_budget);
    println!("{}", validation_table(&report));
    println!("{}", report.summary);
    Ok(report.summary.can_process())
}

pub fn run_schema(args: &SchemaArgs, settings: Settings) -> Result<()> {
    let session = load_session(settings, &args.input.files)?;
    println!("{}", schema_table(&session.dataset(), args.filter.as_deref()));
    Ok(())
}

pub fn run_query(args: &QueryArgs, mut settings: Settings) -> Result<()> {
    apply_query_options(&mut settings, &args.query);
    let sql = args
        .sql
        .clone()
        .unwrap_or_else(|| settings.query.default_query());
    let mut session = load_session(settings, &args.input.files)?;

    let span = info_span!("query");
    let _guard = span.enter();
    session.run_query(&sql)?;
    let max_width = session.settings().display.max_cell_width;
    session.go_to_page(args.page);
    let page = session
        .current_page()
        .context("query produced no result")?;
    let outcome = session
        .last_outcome()
        .context("query produced no result")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output {
        OutputArg::Table => {
            write_result_page(&mut out, &outcome.result, outcome.elapsed, &page, max_width)?;
        }
        OutputArg::Json => {
            serde_json::to_writer_pretty(&mut out, &JsonPage::new(outcome, &page))?;
            writeln!(out)?;
        }
        OutputArg::Csv => {
            write_csv(&outcome.result, &mut out)?;
        }
    }

    if let Some(path) = &args.export {
        let rows = export_csv(&outcome.result, path)
            .with_context(|| format!("export to {}", path.display()))?;
        eprintln!("Exported {rows} rows to {}", path.display());
    }
    Ok(())
}

pub fn run_shell(args: &ShellArgs, mut settings: Settings) -> Result<()> {
    apply_query_options(&mut settings, &args.query);
    let mut session = if args.files.is_empty() {
        Session::new(settings)
    } else {
        load_session(settings, &args.files)?
    };

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if interactive {
        writeln!(out, "Type .help for commands, .quit to leave.")?;
    }
    shell::run_shell(&mut session, stdin.lock(), &mut out, interactive).context("shell I/O")?;
    Ok(())
}

fn apply_query_options(settings: &mut Settings, options: &QueryOptions) {
    if let Some(page_size) = options.page_size {
        settings.query.page_size = page_size.max(1);
    }
    if let Some(table) = &options.table {
        settings.query.table_name = table.clone();
    }
}

/// Loads inputs with a progress bar and reports the outcome on stderr.
fn load_session(settings: Settings, files: &[std::path::PathBuf]) -> Result<Session> {
    let mut session = Session::new(settings);
    let mut progress = MergeProgressBar::new();
    let loaded = session.load(files, |update| progress.update(update));
    progress.finish();
    let report = loaded?;
    for line in load_summary_lines(&report) {
        eprintln!("{line}");
    }
    Ok(session)
}

/// One page of a result, visible columns only.
#[derive(Serialize)]
struct JsonPage<'a> {
    rows: usize,
    elapsed_ms: f64,
    page: usize,
    total_pages: usize,
    columns: Vec<&'a str>,
    data: Vec<Vec<&'a CellValue>>,
}

impl<'a> JsonPage<'a> {
    fn new(outcome: &'a QueryOutcome, page: &iqt_query::Page<'a>) -> Self {
        let result = &outcome.result;
        let visible = result.visible_column_indexes();
        let data = page
            .rows
            .iter()
            .map(|row| visible.iter().filter_map(|&idx| row.get(idx)).collect())
            .collect();
        Self {
            rows: result.len(),
            elapsed_ms: outcome.elapsed.as_secs_f64() * 1000.0,
            page: page.number,
            total_pages: page.total_pages,
            columns: result.visible_columns(),
            data,
        }
    }
}
