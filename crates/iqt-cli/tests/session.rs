//! Integration tests for the load pipeline, session and shell.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use iqt_cli::config::Settings;
use iqt_cli::pipeline::load_dataset;
use iqt_cli::session::Session;
use iqt_cli::shell::run_shell;
use iqt_ingest::ExclusionReason;
use iqt_query::QueryError;

const HEADER: &str = "Conversation ID,Queue,Participant Attributes";

fn write_export(dir: &Path, name: &str, rows: usize, active: usize) -> PathBuf {
    let mut content = format!("{HEADER}\n");
    for idx in 0..rows {
        let status = if idx < active { "active" } else { "closed" };
        content.push_str(&format!(
            "{name}-{idx},Support,\"a1b2-status:{status}; c3d4-region:emea\"\n"
        ));
    }
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write csv");
    path
}

fn shell_output(session: &mut Session, script: &str) -> String {
    let mut out = Vec::new();
    run_shell(session, Cursor::new(script), &mut out, false).expect("shell");
    String::from_utf8(out).expect("utf8 output")
}

fn loaded_session(dir: &TempDir, settings: Settings) -> Session {
    let f1 = write_export(dir.path(), "jan.csv", 10, 2);
    let f2 = write_export(dir.path(), "feb.csv", 15, 3);
    let mut session = Session::new(settings);
    session.load(&[f1, f2], |_| {}).expect("load");
    session
}

#[test]
fn load_reports_excluded_files() {
    let dir = TempDir::new().unwrap();
    let f1 = write_export(dir.path(), "a.csv", 3, 0);
    let bad = dir.path().join("b.csv");
    std::fs::write(&bad, "Conversation ID,Queue\nx,y\n").unwrap();

    let (dataset, report) = load_dataset(&[f1, bad.clone()], 10 * 1024, |_| {}).unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(report.merged.len(), 1);
    assert_eq!(report.excluded.len(), 1);
    assert_eq!(report.excluded[0].path, bad);
    assert!(matches!(
        report.excluded[0].reason,
        ExclusionReason::ColumnMismatch { .. }
    ));
    assert_eq!(report.validation.summary.invalid, 1);
    assert_eq!(
        report.attribute_column.as_deref(),
        Some("Participant Attributes")
    );
}

#[test]
fn directory_input_is_expanded() {
    let dir = TempDir::new().unwrap();
    write_export(dir.path(), "a.csv", 2, 0);
    write_export(dir.path(), "b.csv", 2, 0);
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let (dataset, report) = load_dataset(&[dir.path().to_path_buf()], 10 * 1024, |_| {}).unwrap();
    assert_eq!(dataset.len(), 4);
    assert_eq!(report.merged.len(), 2);
}

#[test]
fn attribute_query_through_shell() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir, Settings::default());

    let output = shell_output(
        &mut session,
        "SELECT * FROM interactions\nWHERE ATTR('status') = 'active';\n",
    );
    assert!(output.contains("5 rows"), "{output}");
    assert!(!output.contains("_rowIndex"), "{output}");
    assert_eq!(session.last_outcome().unwrap().result.len(), 5);
}

#[test]
fn paging_commands() {
    let dir = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.query.page_size = 10;
    let mut session = loaded_session(&dir, settings);

    let output = shell_output(
        &mut session,
        "SELECT * FROM interactions;\n.next\n.next\n.next\n.prev\n.page 1\n",
    );
    assert!(output.contains("Page 1 of 3"), "{output}");
    assert!(output.contains("Page 2 of 3"), "{output}");
    assert!(output.contains("Page 3 of 3"), "{output}");
    assert_eq!(session.current_page().unwrap().number, 1);
}

#[test]
fn row_detail_lists_attributes() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir, Settings::default());

    let output = shell_output(&mut session, "SELECT * FROM interactions LIMIT 1;\n.row 1\n");
    assert!(output.contains("Participant Attributes (2)"), "{output}");
    assert!(output.contains("region"), "{output}");
    assert!(output.contains("emea"), "{output}");

    let detail = session.row_detail(1).unwrap();
    assert_eq!(detail.attributes[0], ("region".to_string(), "emea".to_string()));
    assert!(session.row_detail(2).is_none());
}

#[test]
fn export_and_reset() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir, Settings::default());
    let target = dir.path().join("out.csv");

    let script = format!(
        "SELECT [Conversation ID] FROM interactions WHERE ATTR('status') = 'active';\n.export {}\n.reset\nSELECT 1;\n",
        target.display()
    );
    let output = shell_output(&mut session, &script);
    assert!(output.contains("Exported 5 rows"), "{output}");
    assert!(output.contains("error: no dataset loaded"), "{output}");

    let exported = std::fs::read_to_string(&target).unwrap();
    assert_eq!(exported.lines().count(), 6);
    assert!(!session.is_loaded());
}

#[test]
fn export_without_result_fails() {
    let session = Session::new(Settings::default());
    assert!(matches!(
        session.export(None),
        Err(QueryError::NothingToExport)
    ));
}

#[test]
fn engine_error_is_reported_and_shell_continues() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir, Settings::default());

    let output = shell_output(
        &mut session,
        "SELEC nonsense;\nSELECT COUNT(*) AS n FROM interactions;\n",
    );
    assert!(output.contains("error:"), "{output}");
    assert!(output.contains("1 row"), "{output}");
}

#[test]
fn schema_and_format_commands() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir, Settings::default());

    let output = shell_output(&mut session, ".schema reg\n.format select a,b from t\n.bogus\n");
    assert!(output.contains("ATTR('region')"), "{output}");
    assert!(!output.contains("ATTR('status')"), "{output}");
    assert!(output.contains("SELECT a, b\nFROM t"), "{output}");
    assert!(output.contains("unknown command '.bogus'"), "{output}");
}

#[test]
fn help_describes_explicit_attribute_form() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir, Settings::default());

    let output = shell_output(
        &mut session,
        ".help\nSELECT * FROM interactions WHERE ATTR(_attributes, 'status') = 'active';\n",
    );
    assert!(output.contains("ATTR(_attributes, key)"), "{output}");
    assert!(output.contains("5 rows"), "{output}");
}

#[test]
fn quit_stops_reading() {
    let mut session = Session::new(Settings::default());
    let output = shell_output(&mut session, ".quit\n.help\n");
    assert!(output.is_empty(), "{output}");
}
