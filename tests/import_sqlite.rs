//! End-to-end checks of the import pipeline against a real SQLite database:
//! the parts the inline unit tests cover with a memory double are exercised
//! here through the actual sink, schema, and export path.

use std::fs;
use std::io::BufReader;

use rusqlite::Connection;

use birthstats::db::{ensure_schema, fetch_all_records, open_database, search_records, SqliteSink};
use birthstats::export::write_csv;
use birthstats::import::{import, ImportError};
use birthstats::models::ImportRecord;

const SAMPLE: &str = "\
StatYear,RecordType,AreaCode,AreaName,Gender,BirthWeight,MultipleBirth,BirthCount
2020,Live,001,North,M,Normal,No,42
2020,Live,002,South,F,Low,Yes,17
2021,Live,003,\"East, Riverside\",F,Normal,No,8
";

fn memory_db() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory database");
    ensure_schema(&conn).expect("schema");
    conn
}

fn import_str(conn: &Connection, input: &str, batch_size: usize) -> Result<u64, ImportError> {
    let mut sink = SqliteSink::new(conn);
    import(input.as_bytes(), &mut sink, batch_size).map(|o| o.records_committed)
}

fn stored_records(conn: &Connection) -> Vec<ImportRecord> {
    fetch_all_records(conn)
        .expect("fetch")
        .into_iter()
        .map(|r| r.into_import_record())
        .collect()
}

#[test]
fn import_lands_every_row_in_the_table() {
    let conn = memory_db();

    let committed = import_str(&conn, SAMPLE, 2).expect("import");

    assert_eq!(committed, 3);
    let records = stored_records(&conn);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].year, 2020);
    assert_eq!(records[0].birth_count, 42);
    assert_eq!(records[2].area_name, "East, Riverside");
}

#[test]
fn malformed_line_leaves_the_table_empty() {
    let conn = memory_db();
    let input = format!("{SAMPLE}bad-year,Live,004,West,M,Normal,No,1\n");

    let err = import_str(&conn, &input, 1).expect_err("must abort");

    assert!(matches!(err, ImportError::MalformedLine { line_number: 4, .. }));
    assert!(stored_records(&conn).is_empty());
}

#[test]
fn batch_size_only_changes_io_pattern() {
    let conn_a = memory_db();
    let conn_b = memory_db();

    import_str(&conn_a, SAMPLE, 1).expect("import a");
    import_str(&conn_b, SAMPLE, 100).expect("import b");

    assert_eq!(stored_records(&conn_a), stored_records(&conn_b));
}

#[test]
fn export_then_import_round_trips() {
    let conn = memory_db();
    import_str(&conn, SAMPLE, 2).expect("seed import");

    let mut out = Vec::new();
    let exported = fetch_all_records(&conn).expect("fetch");
    write_csv(&mut out, &exported).expect("export");

    let fresh = memory_db();
    let mut sink = SqliteSink::new(&fresh);
    let outcome =
        import(BufReader::new(out.as_slice()), &mut sink, 2).expect("re-import");

    assert_eq!(outcome.records_committed, 3);
    assert_eq!(stored_records(&fresh), stored_records(&conn));
}

#[test]
fn search_matches_any_column() {
    let conn = memory_db();
    import_str(&conn, SAMPLE, 3).expect("import");

    let by_area = search_records(&conn, "Riverside").expect("search");
    assert_eq!(by_area.len(), 1);
    assert_eq!(by_area[0].area_code, "003");

    let by_year = search_records(&conn, "2020").expect("search");
    assert_eq!(by_year.len(), 2);

    let none = search_records(&conn, "nowhere").expect("search");
    assert!(none.is_empty());
}

#[test]
fn failed_import_leaves_a_populated_table_unchanged() {
    let conn = memory_db();
    import_str(&conn, SAMPLE, 2).expect("seed import");
    let before = stored_records(&conn);

    let bad = "header\n2022,Live,005,North,M,Normal,No,not-a-number\n";
    import_str(&conn, bad, 1).expect_err("must abort");

    assert_eq!(stored_records(&conn), before);

    // The connection is still usable for a fresh import afterwards.
    let good = "header\n2022,Live,005,North,M,Normal,No,9\n";
    assert_eq!(import_str(&conn, good, 1).expect("retry"), 1);
    assert_eq!(stored_records(&conn).len(), before.len() + 1);
}

#[test]
fn on_disk_database_persists_across_connections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("nested").join("birthstats.sqlite");

    {
        let conn = open_database(&db_path).expect("open");
        import_str(&conn, SAMPLE, 2).expect("import");
    }

    let reopened = open_database(&db_path).expect("reopen");
    assert_eq!(stored_records(&reopened).len(), 3);
    assert!(fs::metadata(&db_path).expect("db file").len() > 0);
}
