//! Field validation
//!
//! The store never holds a record that fails its validator. Validation is a
//! capability injected into the store, so tests and embedders can swap the
//! rules; [`StandardRules`] is the default.

use crate::error::ValidationError;
use crate::record::Record;

/// Upper bound on compensation
pub const MAX_SALARY: f64 = 10_000_000.0;

/// Per-field predicates plus a whole-record check built on top of them
pub trait Validator: Send + Sync {
    fn is_valid_id(&self, id: &str) -> bool;
    fn is_valid_name(&self, name: &str) -> bool;
    fn is_valid_position(&self, position: &str) -> bool;
    fn is_valid_salary(&self, salary: f64) -> bool;
    fn is_valid_email(&self, email: &str) -> bool;
    fn is_valid_phone(&self, phone: &str) -> bool;

    /// Skill tags may be empty or repeated, but must not contain the
    /// persisted-format delimiters
    fn is_valid_skill(&self, skill: &str) -> bool {
        !skill.contains(|c: char| matches!(c, '|' | ',' | '\n' | '\r'))
    }

    /// Non-empty, and free of the record-file and CSV delimiters
    fn is_valid_manager(&self, manager_id: &str) -> bool {
        !manager_id.is_empty()
            && !manager_id.contains(|c: char| matches!(c, '|' | ',' | '\n' | '\r'))
    }

    /// Check every field, reporting the first rule violated
    fn validate(&self, record: &Record) -> Result<(), ValidationError> {
        if !self.is_valid_id(&record.id) {
            return Err(ValidationError::InvalidId(record.id.clone()));
        }
        for name in [&record.first_name, &record.last_name] {
            if !self.is_valid_name(name) {
                return Err(ValidationError::InvalidName(name.clone()));
            }
        }
        if !self.is_valid_position(&record.position) {
            return Err(ValidationError::InvalidPosition(record.position.clone()));
        }
        if !self.is_valid_salary(record.salary) {
            return Err(ValidationError::InvalidSalary(record.salary));
        }
        if let Some(email) = &record.email {
            if !self.is_valid_email(email) {
                return Err(ValidationError::InvalidEmail(email.clone()));
            }
        }
        if let Some(phone) = &record.phone {
            if !self.is_valid_phone(phone) {
                return Err(ValidationError::InvalidPhone(phone.clone()));
            }
        }
        if let Some(skill) = record.skills.iter().find(|s| !self.is_valid_skill(s)) {
            return Err(ValidationError::InvalidSkill(skill.clone()));
        }
        if let Some(manager) = &record.manager_id {
            if !self.is_valid_manager(manager) {
                return Err(ValidationError::InvalidManager(manager.clone()));
            }
        }
        Ok(())
    }
}

/// The default rule set
///
/// | field    | rule                                               |
/// |----------|----------------------------------------------------|
/// | id       | two uppercase letters, four digits (`AB1234`)      |
/// | name     | 2-50 of letters, space, `'`, `-`                   |
/// | position | 2-30 of letters, space, `-`                        |
/// | salary   | 0 to 10,000,000 inclusive                          |
/// | email    | `local@domain.tld`, tld at least two letters       |
/// | phone    | optional `+`, then 10-15 digits                    |
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl Validator for StandardRules {
    fn is_valid_id(&self, id: &str) -> bool {
        let bytes = id.as_bytes();
        bytes.len() == 6
            && bytes[..2].iter().all(u8::is_ascii_uppercase)
            && bytes[2..].iter().all(u8::is_ascii_digit)
    }

    fn is_valid_name(&self, name: &str) -> bool {
        (2..=50).contains(&name.len())
            && name
                .bytes()
                .all(|b| b.is_ascii_alphabetic() || matches!(b, b' ' | b'\'' | b'-'))
    }

    fn is_valid_position(&self, position: &str) -> bool {
        (2..=30).contains(&position.len())
            && position
                .bytes()
                .all(|b| b.is_ascii_alphabetic() || matches!(b, b' ' | b'-'))
    }

    fn is_valid_salary(&self, salary: f64) -> bool {
        (0.0..=MAX_SALARY).contains(&salary)
    }

    fn is_valid_email(&self, email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        let Some((host, tld)) = domain.rsplit_once('.') else {
            return false;
        };
        !local.is_empty()
            && local
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'%' | b'+' | b'-'))
            && !host.is_empty()
            && host
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-'))
            && tld.len() >= 2
            && tld.bytes().all(|b| b.is_ascii_alphabetic())
    }

    fn is_valid_phone(&self, phone: &str) -> bool {
        let digits = phone.strip_prefix('+').unwrap_or(phone);
        (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
    }
}
