//! Terminal tables for validation, schema, results and row detail.

use std::io::{self, Write};
use std::time::Duration;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use iqt_model::{Dataset, DatasetStats, ValidationStatus};
use iqt_query::{Page, QueryResult, RowDetail};

use crate::pipeline::{LoadReport, ValidationReport, display_name};

const ELLIPSIS: &str = "...";

/// Shortens `value` to `max_chars` characters followed by `...`.
pub fn truncate_cell(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &value[..cut]),
        None => value.to_string(),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_results_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn status_cell(status: &ValidationStatus) -> Cell {
    let color = match status {
        ValidationStatus::Reference => Color::Blue,
        ValidationStatus::Valid => Color::Green,
        ValidationStatus::Invalid { .. } => Color::Yellow,
        ValidationStatus::Error { .. } => Color::Red,
    };
    Cell::new(status.label()).fg(color).add_attribute(Attribute::Bold)
}

/// One line per file: status, size, column count and the status message.
pub fn validation_table(report: &ValidationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("File"),
        header_cell("Status"),
        header_cell("Size"),
        header_cell("Columns"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    for (idx, file) in report.files.iter().enumerate() {
        table.add_row(vec![
            dim_cell(idx + 1),
            Cell::new(display_name(&file.path)),
            status_cell(&file.status),
            file.size
                .map_or_else(|| dim_cell("-"), |size| Cell::new(format_size(size))),
            if file.headers.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(file.headers.len())
            },
            Cell::new(file.status.to_string()),
        ]);
    }
    table
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Lines describing the outcome of a load.
pub fn load_summary_lines(report: &LoadReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Loaded {} records from {} file(s): {} columns, {} attributes",
        report.stats.records,
        report.merged.len(),
        report.stats.columns,
        report.stats.attributes
    )];
    match &report.attribute_column {
        Some(column) => lines.push(format!("Attributes parsed from '{column}'")),
        None => lines.push("No participant attributes column found".to_string()),
    }
    for excluded in &report.excluded {
        lines.push(format!(
            "Skipped {}: {}",
            display_name(&excluded.path),
            excluded.reason
        ));
    }
    lines
}

pub fn stats_table(stats: &DatasetStats) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Records"), header_cell("Columns"), header_cell("Attributes")]);
    apply_table_style(&mut table);
    for idx in 0..3 {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(stats.records),
        Cell::new(stats.columns),
        Cell::new(stats.attributes),
    ]);
    table
}

/// Column and attribute names whose lower-cased form contains `filter`.
pub fn schema_entries<'a>(dataset: &'a Dataset, filter: Option<&str>) -> Vec<(&'static str, &'a str)> {
    let needle = filter.map(str::to_lowercase);
    let keep = |name: &str| {
        needle
            .as_deref()
            .is_none_or(|needle| name.to_lowercase().contains(needle))
    };
    dataset
        .visible_columns()
        .filter(|name| keep(*name))
        .map(|name| ("column", name))
        .chain(
            dataset
                .attribute_keys()
                .iter()
                .map(String::as_str)
                .filter(|name| keep(*name))
                .map(|name| ("attribute", name)),
        )
        .collect()
}

pub fn schema_table(dataset: &Dataset, filter: Option<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Kind"), header_cell("Name"), header_cell("Use as")]);
    apply_table_style(&mut table);
    for (kind, name) in schema_entries(dataset, filter) {
        let usage = if kind == "attribute" {
            format!("ATTR('{name}')")
        } else {
            format!("\"{}\"", name.replace('"', "\"\""))
        };
        table.add_row(vec![dim_cell(kind), Cell::new(name), Cell::new(usage)]);
    }
    table
}

/// Renders one page of results with internal columns hidden.
pub fn results_table(result: &QueryResult, page: &Page<'_>, max_cell_width: usize) -> Table {
    let visible = result.visible_column_indexes();
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(visible.iter().map(|&idx| header_cell(&result.columns()[idx])));
    table.set_header(header);
    apply_results_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    for (offset, row) in page.rows.iter().enumerate() {
        let mut cells = vec![dim_cell(page.start + offset + 1)];
        cells.extend(visible.iter().map(|&idx| {
            let value = row.get(idx).map(ToString::to_string).unwrap_or_default();
            Cell::new(truncate_cell(&value, max_cell_width))
        }));
        table.add_row(cells);
    }
    table
}

/// `"450 rows (12.34ms)"`
pub fn result_count_line(rows: usize, elapsed: Duration) -> String {
    let noun = if rows == 1 { "row" } else { "rows" };
    format!("{rows} {noun} ({:.2}ms)", elapsed.as_secs_f64() * 1000.0)
}

/// `"Page 2 of 3"`
pub fn page_line(page: &Page<'_>) -> String {
    format!("Page {} of {}", page.number, page.total_pages)
}

/// Writes the count line, then the page table and page position, or a
/// no-match notice for an empty result.
pub fn write_result_page<W: Write>(
    out: &mut W,
    result: &QueryResult,
    elapsed: Duration,
    page: &Page<'_>,
    max_cell_width: usize,
) -> io::Result<()> {
    writeln!(out, "{}", result_count_line(result.len(), elapsed))?;
    if result.is_empty() {
        return writeln!(out, "No records match your query");
    }
    writeln!(out, "{}", results_table(result, page, max_cell_width))?;
    if page.total_pages > 1 {
        writeln!(out, "{}", page_line(page))?;
    }
    Ok(())
}

/// Two-column tables for the structured values and attributes of one row.
pub fn row_detail_tables(detail: &RowDetail) -> (Table, Option<Table>) {
    let mut structured = Table::new();
    structured.set_header(vec![header_cell("Column"), header_cell("Value")]);
    apply_table_style(&mut structured);
    for (name, value) in &detail.structured {
        structured.add_row(vec![Cell::new(name), value_cell(value)]);
    }

    if detail.attributes.is_empty() {
        return (structured, None);
    }
    let mut attributes = Table::new();
    attributes.set_header(vec![
        header_cell(&format!("Participant Attributes ({})", detail.attributes.len())),
        header_cell("Value"),
    ]);
    apply_table_style(&mut attributes);
    for (key, value) in &detail.attributes {
        attributes.add_row(vec![Cell::new(key), value_cell(value)]);
    }
    (structured, Some(attributes))
}

fn value_cell(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}
