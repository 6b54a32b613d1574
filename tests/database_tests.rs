use std::io;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use dblib::Database;
use rusqlite::Connection;
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

const GRADES_DEFINITION: &str = "ID INTEGER PRIMARY KEY AUTOINCREMENT, \
     NAME TEXT NOT NULL, \
     LNAME TEXT NOT NULL, \
     AGE INT NOT NULL, \
     ADDRESS CHAR(50), \
     GRADE CHAR(1)";

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// Run `f` with a thread-local subscriber and return everything it logged
fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (out, logs)
}

// Helper function to create a database file in a fresh temp dir
fn create_temp_db() -> (Database, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("test.db"));
    (db, dir)
}

fn table_count(db: &Database, table: &str) -> Result<i64> {
    let conn = Connection::open(db.path())?;
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[test]
fn test_create_table_is_idempotent() -> Result<()> {
    let (db, _dir) = create_temp_db();

    assert!(db.create_table("T", "ID INTEGER PRIMARY KEY, NAME TEXT"));
    assert!(db.create_table("T", "ID INTEGER PRIMARY KEY, NAME TEXT"));
    assert_eq!(table_count(&db, "T")?, 1);
    Ok(())
}

#[test]
fn test_select_all_data_discards_report() -> Result<()> {
    let (db, _dir) = create_temp_db();
    assert!(db.create_table("T", "ID INTEGER PRIMARY KEY, NAME TEXT"));
    assert!(db.insert_data("T", "ID, NAME", "1, 'Alice'"));

    // The rows are there, select_all_data just never hands them back
    assert_eq!(db.select_all_data("T"), "");
    assert!(db.select_data("T", "*", "").contains("NAME = Alice"));

    let conn = Connection::open(db.path())?;
    let name: String = conn.query_row("SELECT NAME FROM T WHERE ID = 1", [], |row| row.get(0))?;
    assert_eq!(name, "Alice");
    Ok(())
}

#[test]
fn test_insert_then_select_round_trip() {
    let (db, _dir) = create_temp_db();
    assert!(db.create_table("GRADES", GRADES_DEFINITION));
    assert!(db.insert_data(
        "GRADES",
        "NAME, LNAME, AGE, ADDRESS, GRADE",
        "'Alice', 'Chapa', 35, 'Tampa', 'A'"
    ));
    assert!(db.insert_data(
        "GRADES",
        "NAME, LNAME, AGE, ADDRESS, GRADE",
        "'Bob', 'Lee', 22, NULL, 'B'"
    ));

    assert_eq!(db.select_data("GRADES", "NAME", "AGE = 35"), "NAME = Alice\n");
    assert_eq!(
        db.select_data("GRADES", "NAME, AGE, ADDRESS", "NAME = 'Bob'"),
        "NAME = Bob\nAGE = 22\nADDRESS = NULL\n"
    );
    assert_eq!(
        db.select_data("GRADES", "ID, GRADE", ""),
        "ID = 1\nGRADE = A\nID = 2\nGRADE = B\n"
    );
}

#[test]
fn test_update_and_delete() {
    let (db, _dir) = create_temp_db();
    assert!(db.create_table("T", "ID INTEGER PRIMARY KEY, SCORE REAL"));
    assert!(db.insert_data("T", "ID, SCORE", "1, 1.5"));
    assert!(db.insert_data("T", "ID, SCORE", "2, 2.0"));

    assert!(db.update_data("T", "SCORE = SCORE * 2", "ID = 1"));
    assert_eq!(db.select_data("T", "SCORE", "ID = 1"), "SCORE = 3.0\n");

    assert!(db.delete_data("T", "ID = 2"));
    assert_eq!(db.select_data("T", "ID", ""), "ID = 1\n");

    // A condition that matches nothing is still a success
    assert!(db.delete_data("T", "ID = 99"));
}

#[test]
fn test_execution_failure_is_logged() {
    let (db, _dir) = create_temp_db();

    let (ok, logs) = capture_logs(|| db.insert_data("NOPE", "A", "1"));
    assert!(!ok);
    assert!(logs.contains("[ERROR] Failed to execute SQL code: "));
    assert!(logs.contains("no such table: NOPE"));

    let (report, logs) = capture_logs(|| db.select_data("NOPE", "A", "B ="));
    assert_eq!(report, "");
    assert!(logs.contains("[ERROR] Failed to execute SQL code"));
}

#[test]
fn test_unwritable_path_fails_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("test.db");

    let (db, logs) = capture_logs(|| Database::new(&path));
    assert!(logs.contains("[ERROR] Failed to create database: "));
    assert!(!path.exists());

    let (ok, logs) = capture_logs(|| db.create_table("T", "A INTEGER"));
    assert!(!ok);
    assert!(logs.contains("[ERROR] Failed to connect to database: "));

    let (report, _) = capture_logs(|| db.select_data("T", "A", ""));
    assert_eq!(report, "");
    assert_eq!(db.select_all_data("T"), "");
    assert!(!db.insert_data("T", "A", "1"));
    assert!(!db.update_data("T", "A = 2", "A = 1"));
    assert!(!db.delete_data("T", "A = 1"));
}

#[test]
fn test_fragments_are_not_escaped() {
    let (db, _dir) = create_temp_db();
    assert!(db.create_table("T", "NAME TEXT"));

    // Unquoted text is a caller error, rejected by the engine
    assert!(!db.insert_data("T", "NAME", "Alice"));
    // Values containing '=' or newlines are reported as-is
    assert!(db.insert_data("T", "NAME", "'a = b\nc'"));
    assert_eq!(db.select_data("T", "NAME", ""), "NAME = a = b\nc\n");
}

#[test]
fn test_result_primitives_distinguish_empty_from_failed() {
    let (db, _dir) = create_temp_db();
    db.execute("CREATE TABLE T (A INTEGER);").unwrap();

    assert_eq!(db.query_report("SELECT A FROM T").unwrap(), "");
    assert!(db.query_report("SELECT A FROM MISSING").is_err());
}

#[test]
fn test_real_values_match_engine_text() {
    let (db, _dir) = create_temp_db();
    assert!(db.create_table("T", "R REAL"));
    for value in ["1.0/3", "0.1+0.2", "1e15", "1e20", "123456789.123456789"] {
        assert!(db.insert_data("T", "R", value));
    }

    let report = db.select_data("T", "R", "");
    assert_eq!(
        report,
        "R = 0.333333333333333\nR = 0.3\nR = 1.0e+15\nR = 1.0e+20\nR = 123456789.123457\n"
    );
    assert_eq!(report, db.select_data("T", "CAST(R AS TEXT) AS R", ""));
}

#[test]
fn test_select_runs_every_statement_in_fragment() {
    let (db, _dir) = create_temp_db();
    assert!(db.create_table("T", "A INTEGER"));
    assert!(db.insert_data("T", "A", "1"));

    // Rows from each statement are reported in order, as sqlite3_exec does
    assert_eq!(db.select_data("T", "A", "1; SELECT 2 AS B"), "A = 1\nB = 2\n");

    // A failing trailing statement fails the whole read and is logged
    let (report, logs) = capture_logs(|| db.select_data("T", "A", "1; SELECT * FROM MISSING"));
    assert_eq!(report, "");
    assert!(logs.contains("[ERROR] Failed to execute SQL code: no such table: MISSING"));
}
