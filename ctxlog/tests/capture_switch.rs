// Отдельный бинарник: перенаправление stderr действует на весь процесс
#![cfg(unix)]

use ctxlog::{with_config, Logger};
use std::fs;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn later_logger_takes_over_stderr() {
    let dir = TempDir::new().unwrap();
    let first_path = dir.path().join("a.log");
    let second_path = dir.path().join("b.log");

    let _first = Logger::new(&with_config(&first_path).with_capture_stderr(true).build()).unwrap();
    let second =
        Logger::new(&with_config(&second_path).with_capture_stderr(true).build()).unwrap();

    // Тот же файл: ничего не меняется
    assert!(second.capture_stderr().is_ok());

    let mut stderr = std::io::stderr();
    writeln!(stderr, "stderr-marker after switch").unwrap();
    stderr.flush().unwrap();

    let first_content = fs::read_to_string(&first_path).unwrap();
    let second_content = fs::read_to_string(&second_path).unwrap();
    assert!(!first_content.contains("stderr-marker"));
    assert!(second_content.contains("stderr-marker after switch\n"));
    assert!(!second_content.contains("|WARN|"));
}
