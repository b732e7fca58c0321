//! Search predicates

use super::{Department, Record, Status};

/// A conjunction of optional predicates over records
///
/// Every predicate that is set must hold for a record to match; an empty
/// criteria set matches everything. Substring predicates (names, position,
/// skill) ignore case unless `case_sensitive` is set. Salary bounds are
/// inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub department: Option<Department>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub status: Option<Status>,
    pub skill: Option<String>,
    pub case_sensitive: bool,
}

impl SearchCriteria {
    /// Criteria matching every record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn first_name(mut self, part: impl Into<String>) -> Self {
        self.first_name = Some(part.into());
        self
    }

    pub fn last_name(mut self, part: impl Into<String>) -> Self {
        self.last_name = Some(part.into());
        self
    }

    pub fn position(mut self, part: impl Into<String>) -> Self {
        self.position = Some(part.into());
        self
    }

    pub fn department(mut self, department: Department) -> Self {
        self.department = Some(department);
        self
    }

    pub fn min_salary(mut self, min: f64) -> Self {
        self.min_salary = Some(min);
        self
    }

    pub fn max_salary(mut self, max: f64) -> Self {
        self.max_salary = Some(max);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn skill(mut self, part: impl Into<String>) -> Self {
        self.skill = Some(part.into());
        self
    }

    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    /// True if no predicate is set
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.position.is_none()
            && self.department.is_none()
            && self.min_salary.is_none()
            && self.max_salary.is_none()
            && self.status.is_none()
            && self.skill.is_none()
    }

    /// Evaluate every set predicate against `record`
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(id) = &self.id {
            if record.id != *id {
                return false;
            }
        }
        if let Some(part) = &self.first_name {
            if !self.contains(&record.first_name, part) {
                return false;
            }
        }
        if let Some(part) = &self.last_name {
            if !self.contains(&record.last_name, part) {
                return false;
            }
        }
        if let Some(part) = &self.position {
            if !self.contains(&record.position, part) {
                return false;
            }
        }
        if let Some(department) = self.department {
            if record.department != department {
                return false;
            }
        }
        if let Some(min) = self.min_salary {
            if record.salary < min {
                return false;
            }
        }
        if let Some(max) = self.max_salary {
            if record.salary > max {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(part) = &self.skill {
            if !record.skills.iter().any(|s| self.contains(s, part)) {
                return false;
            }
        }
        true
    }

    fn contains(&self, haystack: &str, needle: &str) -> bool {
        if self.case_sensitive {
            haystack.contains(needle)
        } else {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
    }
}
