//! Tests for the record line codec and CSV projection
//!
//! These tests verify:
//! - Encoded field layout (ordinals, empty optionals, comma-joined skills)
//! - Decoding accepts 12 or 13 fields and rejects anything else
//! - Bad numbers and out-of-range ordinals are decode errors
//! - CSV header and row format

use rosterdb::persist::{csv_row, decode_record, encode_record, write_csv, CSV_HEADER};
use rosterdb::record::{AccessLevel, Department, Record, Status};
use rosterdb::RosterError;

// =============================================================================
// Helper Functions
// =============================================================================

fn full_record() -> Record {
    Record::builder("AB1234", "Ada", "Lovelace", "Engineer", Department::Finance, 80_000.5)
        .email("ada@example.com")
        .phone("+15551234567")
        .status(Status::OnLeave)
        .manager("ZZ0001")
        .access_level(AccessLevel::Admin)
        .skills(["Rust", "C++"])
        .hired_at(1_700_000_000)
        .build()
        .unwrap()
}

fn minimal_record() -> Record {
    Record::builder("CD5678", "Grace", "Hopper", "Recruiter", Department::Hr, 60_000.0)
        .hired_at(86_400)
        .build()
        .unwrap()
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_full_record() {
    assert_eq!(
        encode_record(&full_record()),
        "AB1234|Ada|Lovelace|Engineer|2|80000.5|ada@example.com|+15551234567|1700000000|2|ZZ0001|1|Rust,C++"
    );
}

#[test]
fn test_encode_minimal_record() {
    assert_eq!(
        encode_record(&minimal_record()),
        "CD5678|Grace|Hopper|Recruiter|1|60000|||86400|0||0|"
    );
}

#[test]
fn test_decode_restores_every_field() {
    for record in [full_record(), minimal_record()] {
        let decoded = decode_record(&encode_record(&record)).unwrap();
        assert_eq!(decoded, record);
    }
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_twelve_fields_means_no_skills() {
    let record = decode_record("CD5678|Grace|Hopper|Recruiter|1|60000|||86400|0||0").unwrap();
    assert!(record.skills.is_empty());
    assert_eq!(record.email, None);
    assert_eq!(record.manager_id, None);
}

#[test]
fn test_decode_wrong_field_count() {
    for line in [
        "CD5678|Grace|Hopper",
        "CD5678|Grace|Hopper|Recruiter|1|60000|||86400|0|",
        "CD5678|Grace|Hopper|Recruiter|1|60000|||86400|0||0|a|extra",
        "",
    ] {
        assert!(
            matches!(decode_record(line), Err(RosterError::Decode(_))),
            "accepted {:?}",
            line
        );
    }
}

#[test]
fn test_decode_bad_numbers() {
    let bad_salary = "CD5678|Grace|Hopper|Recruiter|1|lots|||86400|0||0|";
    let bad_hired = "CD5678|Grace|Hopper|Recruiter|1|60000|||yesterday|0||0|";
    assert!(matches!(decode_record(bad_salary), Err(RosterError::Decode(_))));
    assert!(matches!(decode_record(bad_hired), Err(RosterError::Decode(_))));
}

#[test]
fn test_decode_out_of_range_ordinals() {
    let bad_department = "CD5678|Grace|Hopper|Recruiter|7|60000|||86400|0||0|";
    let bad_status = "CD5678|Grace|Hopper|Recruiter|1|60000|||86400|4||0|";
    let bad_access = "CD5678|Grace|Hopper|Recruiter|1|60000|||86400|0||2|";
    let negative = "CD5678|Grace|Hopper|Recruiter|-1|60000|||86400|0||0|";
    for line in [bad_department, bad_status, bad_access, negative] {
        assert!(matches!(decode_record(line), Err(RosterError::Decode(_))));
    }
}

#[test]
fn test_decode_does_not_validate_fields() {
    // Field rules are the store's job
    let record = decode_record("bad|G|H|R|1|-5|||0|0||0|").unwrap();
    assert_eq!(record.id, "bad");
    assert_eq!(record.salary, -5.0);
}

// =============================================================================
// CSV Tests
// =============================================================================

#[test]
fn test_csv_header() {
    assert_eq!(
        CSV_HEADER,
        "ID,FirstName,LastName,Position,Department,Salary,Email,Phone,HireDate,Status,ManagerID,Skills,AccessLevel"
    );
}

#[test]
fn test_csv_row_full() {
    assert_eq!(
        csv_row(&full_record()),
        "AB1234,Ada,Lovelace,Engineer,Finance,80000.5,ada@example.com,+15551234567,2023-11-14,On Leave,ZZ0001,\"Rust;C++\",Admin"
    );
}

#[test]
fn test_csv_row_minimal() {
    assert_eq!(
        csv_row(&minimal_record()),
        "CD5678,Grace,Hopper,Recruiter,HR,60000,,,1970-01-02,Active,,\"\",Basic"
    );
}

#[test]
fn test_write_csv() {
    let mut out = Vec::new();
    write_csv(&mut out, &[minimal_record()]).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], CSV_HEADER);
    assert!(lines[1].starts_with("CD5678,"));
}
