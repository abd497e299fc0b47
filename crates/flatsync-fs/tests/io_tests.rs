use flatsync_fs::{NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("passwd"));

    io::write_atomic(&path, b"root:x:0:0:root:/root:/bin/sh\n").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "root:x:0:0:root:/root:/bin/sh\n");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("group");
    fs::write(&file_path, "wheel:x:10:\n").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"wheel:x:10:alice\n").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "wheel:x:10:alice\n");
}

#[test]
fn test_write_creates_missing_parents() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("etc").join("cron.d").join("backup"));

    io::write_text(&path, "0 3 * * * root /usr/local/bin/backup\n").unwrap();

    assert_eq!(
        io::read_text(&path).unwrap(),
        "0 3 * * * root /usr/local/bin/backup\n"
    );
}

#[test]
fn test_write_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("hosts"));

    io::write_text(&path, "127.0.0.1 localhost\n").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "found temp files: {leftovers:?}");
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/flatsync/file.txt");
    assert!(io::read_text(&path).is_err());
}

#[test]
fn test_read_text_or_empty_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("shells"));
    assert_eq!(io::read_text_or_empty(&path).unwrap(), "");
}

#[cfg(unix)]
#[test]
fn test_read_text_or_empty_propagates_other_errors() {
    // A directory cannot be read as text; that is not "missing"
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path());
    assert!(io::read_text_or_empty(&path).is_err());
}
