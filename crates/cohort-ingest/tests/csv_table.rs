//! Integration tests for CSV loading.

use std::io::Write;

use tempfile::NamedTempFile;

use cohort_ingest::{IngestError, read_record_table};

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn loads_header_and_rows() {
    let file = write_file("id,year_of_birth,country_code\np1,1990,GB\np2,1985,GB\n");
    let (table, stats) = read_record_table(file.path()).expect("load");

    assert_eq!(table.headers, vec!["id", "year_of_birth", "country_code"]);
    assert_eq!(table.len(), 2);
    assert_eq!(stats.rows, 2);
    assert_eq!(stats.skipped, 0);
    assert_eq!(table.value(0, 1), "1990");
    assert_eq!(table.index_of("country_code").unwrap(), 2);
}

#[test]
fn skips_rows_with_wrong_field_count() {
    let file = write_file("id,year_of_birth\np1,1990\nonly-one-field\np2,1985,extra\np3,2000\n");
    let (table, stats) = read_record_table(file.path()).expect("load");

    assert_eq!(table.len(), 2);
    assert_eq!(stats.skipped, 2);
    assert_eq!(table.value(0, 0), "p1");
    assert_eq!(table.value(1, 0), "p3");
}

#[test]
fn keeps_quoted_delimiters_and_empty_fields() {
    let file = write_file("id,notes,temperature\np1,\"fever, mild\",\np2,none,37.2\n");
    let (table, _) = read_record_table(file.path()).expect("load");

    assert_eq!(table.value(0, 1), "fever, mild");
    assert_eq!(table.value(0, 2), "");
    assert_eq!(table.value(1, 2), "37.2");
}

#[test]
fn header_only_file_yields_empty_table() {
    let file = write_file("id,year_of_birth\n");
    let (table, stats) = read_record_table(file.path()).expect("load");

    assert!(table.is_empty());
    assert_eq!(stats.rows, 0);
}

#[test]
fn empty_file_is_an_error() {
    let file = write_file("");
    let error = read_record_table(file.path()).expect_err("should fail");
    assert!(matches!(error, IngestError::MissingHeader { .. }));
}

#[test]
fn rows_carry_source_lines() {
    let file = write_file("id,year_of_birth\np1,1990\nbad\np2,1985\n");
    let (table, _) = read_record_table(file.path()).expect("load");

    assert_eq!(table.rows[0].line, 2);
    assert_eq!(table.rows[1].line, 4);
}
