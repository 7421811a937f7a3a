use std::fs;

use ocr_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn write_keeps_text_verbatim() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let text = "line one\n\n  indented\tline\n";
    let written = writer.write("out.txt", text).unwrap();
    assert_eq!(written.file_name().unwrap(), "out.txt");
    assert_eq!(fs::read_to_string(&written).unwrap(), text);
}

#[test]
fn existing_downloads_are_not_replaced() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("out.txt", "first").unwrap();
    let err = writer.write("out.txt", "second").unwrap_err();
    assert!(matches!(err, PersistError::AlreadyExists(ref p) if *p == first));
    assert_eq!(fs::read_to_string(&first).unwrap(), "first");
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("out.txt", "data");
    assert!(matches!(result, Err(PersistError::OutputDir(_))));
    assert!(!file_path.with_file_name("out.txt").exists());
}
