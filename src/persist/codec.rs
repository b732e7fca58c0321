//! Record line codec
//!
//! ## Line Format
//! ```text
//! id|first|last|position|dept|salary|email|phone|hired|status|manager|access|skill1,skill2,...
//! ```
//!
//! - Enumerations are written as ordinals (see `Department::ordinal` etc.)
//! - Absent email/phone/manager are empty fields
//! - Skills are comma-joined; an empty field means no skills
//! - No escaping: the validator keeps `|` (and `,` in skills) out of fields

use crate::error::{Result, RosterError};
use crate::record::{AccessLevel, Department, Record, Status};

/// Separator between fields
pub const FIELD_DELIMITER: char = '|';

/// Separator between skill tags
pub const SKILL_DELIMITER: char = ',';

/// Fields up to and including the access level
const REQUIRED_FIELDS: usize = 12;

/// Required fields plus the skills field
const MAX_FIELDS: usize = 13;

// =============================================================================
// Encoding
// =============================================================================

/// Encode a record as a single line (no trailing newline)
pub fn encode_record(record: &Record) -> String {
    let skills = record.skills.join(&SKILL_DELIMITER.to_string());
    let fields: [String; MAX_FIELDS] = [
        record.id.clone(),
        record.first_name.clone(),
        record.last_name.clone(),
        record.position.clone(),
        record.department.ordinal().to_string(),
        record.salary.to_string(),
        record.email.clone().unwrap_or_default(),
        record.phone.clone().unwrap_or_default(),
        record.hired_at.to_string(),
        record.status.ordinal().to_string(),
        record.manager_id.clone().unwrap_or_default(),
        record.access_level.ordinal().to_string(),
        skills,
    ];
    fields.join(&FIELD_DELIMITER.to_string())
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode one line produced by [`encode_record`]
///
/// Only the layout is checked here; field rules are enforced when the
/// record is inserted into a store.
pub fn decode_record(line: &str) -> Result<Record> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if !(REQUIRED_FIELDS..=MAX_FIELDS).contains(&fields.len()) {
        return Err(RosterError::Decode(format!(
            "expected {} or {} fields, got {}",
            REQUIRED_FIELDS,
            MAX_FIELDS,
            fields.len()
        )));
    }

    let department = parse_ordinal(fields[4], "department", Department::from_ordinal)?;
    let salary = fields[5].parse::<f64>().map_err(|e| {
        RosterError::Decode(format!("invalid salary {:?}: {}", fields[5], e))
    })?;
    let hired_at = fields[8].parse::<i64>().map_err(|e| {
        RosterError::Decode(format!("invalid hire timestamp {:?}: {}", fields[8], e))
    })?;
    let status = parse_ordinal(fields[9], "status", Status::from_ordinal)?;
    let access_level = parse_ordinal(fields[11], "access level", AccessLevel::from_ordinal)?;

    let skills = match fields.get(12) {
        Some(s) if !s.is_empty() => s.split(SKILL_DELIMITER).map(String::from).collect(),
        _ => Vec::new(),
    };

    Ok(Record {
        id: fields[0].to_string(),
        first_name: fields[1].to_string(),
        last_name: fields[2].to_string(),
        position: fields[3].to_string(),
        department,
        salary,
        email: optional(fields[6]),
        phone: optional(fields[7]),
        hired_at,
        status,
        skills,
        manager_id: optional(fields[10]),
        access_level,
    })
}

fn parse_ordinal<T>(field: &str, what: &str, from_ordinal: fn(u8) -> Option<T>) -> Result<T> {
    field
        .parse::<u8>()
        .ok()
        .and_then(from_ordinal)
        .ok_or_else(|| RosterError::Decode(format!("invalid {} ordinal {:?}", what, field)))
}

fn optional(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}
