//! The stored record type and its validating builder

use crate::clock;
use crate::error::ValidationError;
use crate::validate::{StandardRules, Validator};

use super::{AccessLevel, Department, Status};

/// One employee record
///
/// The store keeps its own copy of every record; values handed out by the
/// store are clones, so mutating a `Record` never touches stored state.
/// Changes go back in through `KeyedStore::update`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique key, `[A-Z]{2}[0-9]{4}`
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub department: Department,
    pub salary: f64,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Unix epoch seconds, fixed at creation
    pub hired_at: i64,
    pub status: Status,
    /// Ordered, duplicates allowed
    pub skills: Vec<String>,
    /// Id of another record; not checked for existence
    pub manager_id: Option<String>,
    pub access_level: AccessLevel,
}

impl Record {
    /// Start building a record from its required fields
    pub fn builder(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        position: impl Into<String>,
        department: Department,
        salary: f64,
    ) -> RecordBuilder {
        RecordBuilder {
            record: Record {
                id: id.into(),
                first_name: first_name.into(),
                last_name: last_name.into(),
                position: position.into(),
                department,
                salary,
                email: None,
                phone: None,
                hired_at: clock::now_epoch_secs(),
                status: Status::Active,
                skills: Vec::new(),
                manager_id: None,
                access_level: AccessLevel::Basic,
            },
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Hire date as `YYYY-MM-DD` (UTC)
    pub fn hire_date(&self) -> String {
        clock::format_date(self.hired_at)
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}

/// Builder for [`Record`]; `build` runs the standard field rules
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.record.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.record.phone = Some(phone.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.record.status = status;
        self
    }

    pub fn skill(mut self, skill: impl Into<String>) -> Self {
        self.record.skills.push(skill.into());
        self
    }

    pub fn skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.skills.extend(skills.into_iter().map(Into::into));
        self
    }

    pub fn manager(mut self, manager_id: impl Into<String>) -> Self {
        self.record.manager_id = Some(manager_id.into());
        self
    }

    pub fn access_level(mut self, access_level: AccessLevel) -> Self {
        self.record.access_level = access_level;
        self
    }

    /// Override the hire timestamp (defaults to now)
    pub fn hired_at(mut self, epoch_secs: i64) -> Self {
        self.record.hired_at = epoch_secs;
        self
    }

    pub fn build(self) -> Result<Record, ValidationError> {
        StandardRules.validate(&self.record)?;
        Ok(self.record)
    }

    /// Return the record without validation (for tests and tools that
    /// need to construct malformed input)
    pub fn build_unchecked(self) -> Record {
        self.record
    }
}
