use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn temp_path(label: &str, extension: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "ecomload_{label}_{}_{nanos}_{seq}.{extension}",
        std::process::id()
    ))
}

pub fn write_csv(label: &str, lines: &[&str]) -> PathBuf {
    let path = temp_path(label, "csv");
    rewrite_csv(&path, lines);
    path
}

pub fn rewrite_csv(path: &Path, lines: &[&str]) {
    let mut file = fs::File::create(path).expect("create csv");
    for line in lines {
        writeln!(file, "{line}").expect("write line");
    }
}

pub fn users_csv_lines(rows: usize) -> Vec<String> {
    let mut lines = vec!["id,name,email".to_string()];
    for id in 1..=rows {
        lines.push(format!("{id},User {id},user{id}@example.com"));
    }
    lines
}

pub fn cleanup_db(db_path: &Path) {
    let _ = fs::remove_file(db_path);
    let _ = fs::remove_file(format!("{}.wal", db_path.display()));
    let _ = fs::remove_file(format!("{}.wal.lck", db_path.display()));
}

pub fn cleanup_file(path: &Path) {
    let _ = fs::remove_file(path);
}
