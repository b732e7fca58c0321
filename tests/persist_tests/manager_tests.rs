//! Tests for PersistenceManager
//!
//! These tests verify:
//! - Save/load round trip preserves every record
//! - Backup-before-write produces a `.bak` copy of the previous file
//! - Missing file loads as an empty store
//! - Tolerant load: corrupt, invalid, and duplicate lines are counted, not fatal
//! - Header count is advisory; a blank line ends the record section
//! - CRLF line endings and non-UTF-8 lines
//! - CSV export

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rosterdb::log::{LogLevel, MemoryLogger, NullLogger};
use rosterdb::persist::{encode_record, PersistenceManager, CSV_HEADER};
use rosterdb::record::{Department, Record, Status};
use rosterdb::table::KeyedStore;
use rosterdb::LoadReport;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("employees.dat");
    (temp_dir, path)
}

fn quiet_manager(path: &PathBuf) -> PersistenceManager {
    PersistenceManager::with_logger(path, Arc::new(NullLogger))
}

fn quiet_store() -> KeyedStore {
    KeyedStore::builder().logger(Arc::new(NullLogger)).build()
}

fn employee(id: &str, department: Department, salary: f64) -> Record {
    Record::builder(id, "Test", "Person", "Analyst", department, salary)
        .hired_at(1_600_000_000)
        .build()
        .unwrap()
}

fn populated_store(n: usize) -> KeyedStore {
    let store = quiet_store();
    for i in 0..n {
        store
            .insert(employee(&format!("AA{:04}", i), Department::Sales, 1_000.0 * i as f64))
            .unwrap();
    }
    store
}

fn sorted(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by(|a, b| a.id.cmp(&b.id));
    records
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_save_then_load_round_trip() {
    let (_temp, path) = setup_temp_file();
    let manager = quiet_manager(&path);

    let store = quiet_store();
    store
        .insert(
            Record::builder(
                "AA1111",
                "Ada",
                "Lovelace",
                "Engineer",
                Department::Engineering,
                80_000.0,
            )
            .email("ada@example.com")
            .phone("5551234567")
            .manager("ZZ0001")
            .status(Status::OnLeave)
            .skills(["Rust", "Math"])
            .build()
            .unwrap(),
        )
        .unwrap();
    store.insert(employee("BB2222", Department::Hr, 60_000.0)).unwrap();

    assert_eq!(manager.save(&store).unwrap(), 2);

    let loaded = quiet_store();
    let report = manager.load(&loaded).unwrap();

    assert_eq!(
        report,
        LoadReport {
            file_found: true,
            declared_count: Some(2),
            loaded: 2,
            skipped: 0,
            duplicates: 0,
        }
    );
    assert_eq!(sorted(loaded.get_all()), sorted(store.get_all()));
}

#[test]
fn test_save_file_layout() {
    let (_temp, path) = setup_temp_file();
    let store = quiet_store();
    let record = employee("BB2222", Department::Hr, 60_000.0);
    store.insert(record.clone()).unwrap();

    quiet_manager(&path).save(&store).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, format!("1\n{}\n", encode_record(&record)));
}

#[test]
fn test_save_empty_store() {
    let (_temp, path) = setup_temp_file();
    let manager = quiet_manager(&path);

    assert_eq!(manager.save(&quiet_store()).unwrap(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "0\n");

    let report = manager.load(&quiet_store()).unwrap();
    assert!(report.file_found);
    assert_eq!(report.loaded, 0);
}

#[test]
fn test_round_trip_many_records() {
    let (_temp, path) = setup_temp_file();
    let manager = quiet_manager(&path);
    let store = populated_store(250);

    manager.save(&store).unwrap();
    let loaded = quiet_store();
    manager.load(&loaded).unwrap();

    assert_eq!(loaded.len(), 250);
    assert_eq!(sorted(loaded.get_all()), sorted(store.get_all()));
}

// =============================================================================
// Backup Tests
// =============================================================================

#[test]
fn test_first_save_creates_no_backup() {
    let (_temp, path) = setup_temp_file();
    let manager = quiet_manager(&path);

    manager.save(&populated_store(1)).unwrap();

    assert!(path.exists());
    assert!(!manager.backup_path().exists());
}

#[test]
fn test_second_save_backs_up_previous_file() {
    let (_temp, path) = setup_temp_file();
    let manager = quiet_manager(&path);

    manager.save(&populated_store(1)).unwrap();
    let first = fs::read_to_string(&path).unwrap();

    manager.save(&populated_store(3)).unwrap();

    assert_eq!(manager.backup_path(), path.with_file_name("employees.dat.bak"));
    assert_eq!(fs::read_to_string(manager.backup_path()).unwrap(), first);
    assert!(fs::read_to_string(&path).unwrap().starts_with("3\n"));
}

// =============================================================================
// Tolerant Load Tests
// =============================================================================

#[test]
fn test_missing_file_loads_empty() {
    let (_temp, path) = setup_temp_file();
    let store = quiet_store();

    let report = quiet_manager(&path).load(&store).unwrap();

    assert_eq!(report, LoadReport::default());
    assert!(!report.file_found);
    assert!(store.is_empty());
}

#[test]
fn test_empty_file_loads_empty() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "").unwrap();

    let report = quiet_manager(&path).load(&quiet_store()).unwrap();

    assert!(report.file_found);
    assert_eq!(report.declared_count, None);
    assert_eq!(report.loaded, 0);
}

#[test]
fn test_one_corrupt_line_is_skipped() {
    let (_temp, path) = setup_temp_file();
    let good: Vec<String> = (0..5)
        .map(|i| encode_record(&employee(&format!("AA{:04}", i), Department::Sales, 1.0)))
        .collect();
    let contents = format!(
        "6\n{}\n{}\nthis|is|not|a|record\n{}\n{}\n{}\n",
        good[0], good[1], good[2], good[3], good[4]
    );
    fs::write(&path, contents).unwrap();

    let logger = Arc::new(MemoryLogger::new());
    let manager = PersistenceManager::with_logger(&path, logger.clone());
    let store = quiet_store();
    let report = manager.load(&store).unwrap();

    assert_eq!(report.loaded, 5);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.len(), 5);
    assert!(logger.contains("line 4"));
}

#[test]
fn test_invalid_record_line_is_skipped() {
    let (_temp, path) = setup_temp_file();
    let good = encode_record(&employee("AA0001", Department::Sales, 1.0));
    // Decodes fine but fails the salary rule
    let invalid = "AA0002|Test|Person|Analyst|5|-100|||0|0||0|";
    fs::write(&path, format!("2\n{}\n{}\n", good, invalid)).unwrap();

    let store = quiet_store();
    let report = quiet_manager(&path).load(&store).unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 1);
    assert!(!store.contains("AA0002"));
}

#[test]
fn test_duplicate_lines_counted_separately() {
    let (_temp, path) = setup_temp_file();
    let line = encode_record(&employee("AA0001", Department::Sales, 1.0));
    fs::write(&path, format!("2\n{}\n{}\n", line, line)).unwrap();

    let store = quiet_store();
    let report = quiet_manager(&path).load(&store).unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_header_count_is_advisory() {
    let (_temp, path) = setup_temp_file();
    let a = encode_record(&employee("AA0001", Department::Sales, 1.0));
    let b = encode_record(&employee("AA0002", Department::Sales, 1.0));
    fs::write(&path, format!("10\n{}\n{}\n", a, b)).unwrap();

    let logger = Arc::new(MemoryLogger::new());
    let store = quiet_store();
    let report = PersistenceManager::with_logger(&path, logger.clone())
        .load(&store)
        .unwrap();

    assert_eq!(report.declared_count, Some(10));
    assert_eq!(report.loaded, 2);
    assert!(logger.count(LogLevel::Warning) >= 1);
}

#[test]
fn test_unreadable_header_still_loads_records() {
    let (_temp, path) = setup_temp_file();
    let a = encode_record(&employee("AA0001", Department::Sales, 1.0));
    fs::write(&path, format!("lots\n{}\n", a)).unwrap();

    let report = quiet_manager(&path).load(&quiet_store()).unwrap();

    assert_eq!(report.declared_count, None);
    assert_eq!(report.loaded, 1);
}

#[test]
fn test_blank_line_ends_records() {
    let (_temp, path) = setup_temp_file();
    let a = encode_record(&employee("AA0001", Department::Sales, 1.0));
    let b = encode_record(&employee("AA0002", Department::Sales, 1.0));
    fs::write(&path, format!("2\n{}\n\n{}\n", a, b)).unwrap();

    let store = quiet_store();
    let report = quiet_manager(&path).load(&store).unwrap();

    assert_eq!(report.loaded, 1);
    assert!(!store.contains("AA0002"));
}

#[test]
fn test_missing_trailing_newline() {
    let (_temp, path) = setup_temp_file();
    let a = encode_record(&employee("AA0001", Department::Sales, 1.0));
    fs::write(&path, format!("1\n{}", a)).unwrap();

    let report = quiet_manager(&path).load(&quiet_store()).unwrap();
    assert_eq!(report.loaded, 1);
}

#[test]
fn test_crlf_line_endings() {
    let (_temp, path) = setup_temp_file();
    let a = encode_record(&employee("AA0001", Department::Sales, 1.0));
    let b = encode_record(&employee("AA0002", Department::Sales, 1.0));
    fs::write(&path, format!("2\r\n{}\r\n{}\r\n", a, b)).unwrap();

    let store = quiet_store();
    let report = quiet_manager(&path).load(&store).unwrap();

    assert_eq!(report.declared_count, Some(2));
    assert_eq!(report.loaded, 2);
    assert!(store.find("AA0002").unwrap().skills.is_empty());
}

#[test]
fn test_non_utf8_line_is_skipped() {
    let (_temp, path) = setup_temp_file();
    let a = encode_record(&employee("AA0001", Department::Sales, 1.0));
    let mut bytes = format!("2\n{}\n", a).into_bytes();
    bytes.extend_from_slice(b"AA0002|\xff\xfe|Person\n");
    fs::write(&path, bytes).unwrap();

    let report = quiet_manager(&path).load(&quiet_store()).unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 1);
}

// =============================================================================
// CSV Export Tests
// =============================================================================

#[test]
fn test_export_csv() {
    let (temp, path) = setup_temp_file();
    let csv_path = temp.path().join("out.csv");
    let store = populated_store(3);

    let rows = quiet_manager(&path).export_csv(&store, &csv_path).unwrap();

    assert_eq!(rows, 3);
    let text = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], CSV_HEADER);
    assert!(lines[1..].iter().all(|l| l.contains(",Sales,")));
}

#[test]
fn test_export_to_missing_directory_fails() {
    let (temp, path) = setup_temp_file();
    let csv_path = temp.path().join("no_such_dir").join("out.csv");

    assert!(quiet_manager(&path)
        .export_csv(&populated_store(1), &csv_path)
        .is_err());
}
