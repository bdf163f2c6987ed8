use super::*;
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_mutreview_table_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_parse_tsv_skips_comments_and_blank_lines() {
    let text = "#version 2.4\n\nHugo_Symbol\tChromosome\nTP53\t17\n\nKRAS\t12\n";
    let table = parse_tsv(Cursor::new(text), "mem").unwrap();
    assert_eq!(table.columns(), &["Hugo_Symbol", "Chromosome"]);
    assert_eq!(table.n_rows(), 2);
    assert_eq!(table.value(1, 0), "KRAS");
}

#[test]
fn test_parse_tsv_pads_short_rows_and_drops_extra_fields() {
    let text = "a\tb\tc\n1\n1\t2\t3\t4\n";
    let table = parse_tsv(Cursor::new(text), "mem").unwrap();
    assert_eq!(table.rows()[0], vec!["1", "", ""]);
    assert_eq!(table.rows()[1], vec!["1", "2", "3"]);
}

#[test]
fn test_parse_tsv_handles_crlf() {
    let table = parse_tsv(Cursor::new("a\tb\r\nx\ty\r\n"), "mem").unwrap();
    assert_eq!(table.columns(), &["a", "b"]);
    assert_eq!(table.value(0, 1), "y");
}

#[test]
fn test_parse_tsv_without_header_is_error() {
    let err = parse_tsv(Cursor::new("\n#only comments\n"), "mem").unwrap_err();
    assert!(matches!(err, InputError::Parse(_)));
}

#[test]
fn test_resolve_alias_prefers_first_present_spelling() {
    let table = Table::new(
        vec!["Start_Position".to_string(), "Start_position".to_string()],
        Vec::new(),
    );
    assert_eq!(table.resolve_alias("Start_position|Start_Position"), Some(1));
    assert_eq!(table.resolve_alias("Start_Position|Start_position"), Some(0));

    let only_second = Table::new(vec!["Start_Position".to_string()], Vec::new());
    assert_eq!(only_second.resolve_alias("Start_position|Start_Position"), Some(0));
    assert_eq!(only_second.resolve_alias("End_position|End_Position"), None);
}

#[test]
fn test_value_out_of_range_is_empty() {
    let table = Table::new(vec!["a".to_string()], vec![vec!["1".to_string()]]);
    assert_eq!(table.value(0, 5), "");
    assert_eq!(table.value(9, 0), "");
}

#[test]
fn test_read_tsv_plain_and_gz() {
    let dir = make_temp_dir();
    let plain = dir.join("t.tsv");
    fs::write(&plain, "x\ty\n1\t2\n").unwrap();
    let gz = dir.join("t.tsv.gz");
    let mut enc = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
    enc.write_all(b"x\ty\n3\t4\n").unwrap();
    enc.finish().unwrap();

    assert_eq!(read_tsv(&plain).unwrap().value(0, 1), "2");
    assert_eq!(read_tsv(&gz).unwrap().value(0, 0), "3");
}

#[test]
fn test_read_tsv_missing_file() {
    let dir = make_temp_dir();
    let err = read_tsv(&dir.join("absent.tsv")).unwrap_err();
    assert!(matches!(err, InputError::MissingFile(_)));
}
