//! Line-oriented interactive shell.
//!
//! Lines starting with `.` are commands. Anything else is SQL, collected
//! until a line ends with `;` or a blank line is entered.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};

use iqt_query::format_query;

use crate::progress::MergeProgressBar;
use crate::session::Session;
use crate::summary::{
    load_summary_lines, row_detail_tables, schema_table, stats_table, write_result_page,
};

const PROMPT: &str = "iqt> ";
const CONTINUATION_PROMPT: &str = "...> ";

pub const HELP: &str = "\
Enter SQL ending with ';' (or a blank line) to run it against the loaded table.
Use ATTR('key') to read a participant attribute of the current row. The key
must be a quoted literal; ATTR(key) with any other argument fails. Where that
rewrite cannot apply (a computed key, a subquery over another table), pass
the row's mapping explicitly: ATTR(_attributes, key).

Commands:
  .help              Show this help
  .schema [FILTER]   List columns and attribute keys
  .stats             Show record, column and attribute counts
  .page N            Show page N of the last result
  .next / .prev      Move one page forward or back
  .row N             Show every column and attribute of result row N
  .export [PATH]     Write the last result as CSV
  .format SQL        Reformat a query for readability
  .load FILES...     Load CSV files or folders, replacing the dataset
  .reset             Clear the dataset and results
  .quit              Leave the shell";

/// A parsed dot-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Schema(Option<String>),
    Stats,
    Page(usize),
    Next,
    Prev,
    Row(usize),
    Export(Option<PathBuf>),
    Format(String),
    Load(Vec<PathBuf>),
    Reset,
    Quit,
}

/// Parses a line starting with `.`.
pub fn parse_command(line: &str) -> Result<ShellCommand> {
    let line = line.trim();
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(name, rest)| (name, rest.trim()));
    let argument = (!rest.is_empty()).then(|| rest.to_string());

    let command = match name.to_ascii_lowercase().as_str() {
        ".help" | ".h" => ShellCommand::Help,
        ".schema" => ShellCommand::Schema(argument),
        ".stats" => ShellCommand::Stats,
        ".page" => ShellCommand::Page(parse_number(rest, ".page")?),
        ".next" => ShellCommand::Next,
        ".prev" => ShellCommand::Prev,
        ".row" => ShellCommand::Row(parse_number(rest, ".row")?),
        ".export" => ShellCommand::Export(argument.map(PathBuf::from)),
        ".format" => match argument {
            Some(sql) => ShellCommand::Format(sql),
            None => bail!("usage: .format SQL"),
        },
        ".load" => {
            let files: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
            if files.is_empty() {
                bail!("usage: .load FILES...");
            }
            ShellCommand::Load(files)
        }
        ".reset" => ShellCommand::Reset,
        ".quit" | ".exit" | ".q" => ShellCommand::Quit,
        other => bail!("unknown command '{other}'; try .help"),
    };
    Ok(command)
}

fn parse_number(text: &str, command: &str) -> Result<usize> {
    text.parse::<usize>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| anyhow!("usage: {command} N (a positive number)"))
}

/// Reads lines from `input` until EOF or `.quit`, writing all output to `out`.
///
/// Prompts are only written when `interactive` is set.
pub fn run_shell<R, W>(session: &mut Session, input: R, out: &mut W, interactive: bool) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut buffer = String::new();
    prompt(out, interactive, buffer.is_empty())?;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        if buffer.is_empty() && trimmed.starts_with('.') {
            match parse_command(trimmed) {
                Ok(ShellCommand::Quit) => return Ok(()),
                Ok(command) => run_command(session, command, out)?,
                Err(error) => writeln!(out, "error: {error}")?,
            }
        } else if !trimmed.is_empty() {
            buffer.push_str(&line);
            buffer.push('\n');
            if trimmed.ends_with(';') {
                run_sql(session, &buffer, out)?;
                buffer.clear();
            }
        } else if !buffer.is_empty() {
            run_sql(session, &buffer, out)?;
            buffer.clear();
        }
        prompt(out, interactive, buffer.is_empty())?;
    }

    if !buffer.trim().is_empty() {
        run_sql(session, &buffer, out)?;
    }
    Ok(())
}

fn prompt<W: Write>(out: &mut W, interactive: bool, fresh: bool) -> io::Result<()> {
    if interactive {
        write!(out, "{}", if fresh { PROMPT } else { CONTINUATION_PROMPT })?;
        out.flush()?;
    }
    Ok(())
}

fn run_sql<W: Write>(session: &mut Session, sql: &str, out: &mut W) -> io::Result<()> {
    let sql = sql.trim().trim_end_matches(';');
    if let Err(error) = session.run_query(sql) {
        return writeln!(out, "error: {error}");
    }
    show_current_page(session, out)
}

fn run_command<W: Write>(session: &mut Session, command: ShellCommand, out: &mut W) -> io::Result<()> {
    match command {
        ShellCommand::Help => writeln!(out, "{HELP}"),
        ShellCommand::Schema(filter) => {
            if !session.is_loaded() {
                return writeln!(out, "error: no dataset loaded");
            }
            writeln!(out, "{}", schema_table(&session.dataset(), filter.as_deref()))
        }
        ShellCommand::Stats => match session.stats() {
            Some(stats) => writeln!(out, "{}", stats_table(&stats)),
            None => writeln!(out, "error: no dataset loaded"),
        },
        ShellCommand::Page(number) => {
            session.go_to_page(number);
            show_current_page(session, out)
        }
        ShellCommand::Next => {
            session.next_page();
            show_current_page(session, out)
        }
        ShellCommand::Prev => {
            session.prev_page();
            show_current_page(session, out)
        }
        ShellCommand::Row(number) => match session.row_detail(number) {
            Some(detail) => {
                let (structured, attributes) = row_detail_tables(&detail);
                writeln!(out, "{structured}")?;
                if let Some(attributes) = attributes {
                    writeln!(out, "{attributes}")?;
                }
                Ok(())
            }
            None => writeln!(out, "error: no result row {number}"),
        },
        ShellCommand::Export(path) => match session.export(path.as_deref()) {
            Ok((path, rows)) => writeln!(out, "Exported {rows} rows to {}", path.display()),
            Err(error) => writeln!(out, "error: {error}"),
        },
        ShellCommand::Format(sql) => writeln!(out, "{}", format_query(&sql)),
        ShellCommand::Load(files) => {
            let mut progress = MergeProgressBar::new();
            let loaded = session.load(&files, |update| progress.update(update));
            progress.finish();
            match loaded {
                Ok(report) => {
                    for line in load_summary_lines(&report) {
                        writeln!(out, "{line}")?;
                    }
                    Ok(())
                }
                Err(error) => writeln!(out, "error: {error:#}"),
            }
        }
        ShellCommand::Reset => {
            session.reset();
            writeln!(out, "Dataset cleared")
        }
        ShellCommand::Quit => Ok(()),
    }
}

fn show_current_page<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
    let max_width = session.settings().display.max_cell_width;
    let (Some(page), Some(outcome)) = (session.current_page(), session.last_outcome()) else {
        return writeln!(out, "error: run a query first");
    };
    write_result_page(out, &outcome.result, outcome.elapsed, &page, max_width)
}
