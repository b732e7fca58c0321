//! Closed enumerations carried by a record
//!
//! Each enum has a fixed ordinal (used by the persisted line format) and a
//! display name (used by the CSV projection and the CLI).

use std::fmt;
use std::str::FromStr;

use crate::error::ParseEnumError;

/// Normalize a user-supplied name: lowercase, drop spaces, dashes and underscores
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

// =============================================================================
// Department
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Department {
    Engineering,
    Hr,
    Finance,
    Marketing,
    Operations,
    Sales,
    Unknown,
}

impl Department {
    /// All departments in ordinal order
    pub const ALL: [Department; 7] = [
        Department::Engineering,
        Department::Hr,
        Department::Finance,
        Department::Marketing,
        Department::Operations,
        Department::Sales,
        Department::Unknown,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Hr => "HR",
            Department::Finance => "Finance",
            Department::Marketing => "Marketing",
            Department::Operations => "Operations",
            Department::Sales => "Sales",
            Department::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|d| normalize(d.as_str()) == wanted)
            .ok_or_else(|| ParseEnumError {
                kind: "department",
                value: s.to_string(),
            })
    }
}

// =============================================================================
// Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Active,
    Inactive,
    OnLeave,
    Terminated,
}

impl Status {
    /// All statuses in ordinal order
    pub const ALL: [Status; 4] = [
        Status::Active,
        Status::Inactive,
        Status::OnLeave,
        Status::Terminated,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Inactive => "Inactive",
            Status::OnLeave => "On Leave",
            Status::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|st| normalize(st.as_str()) == wanted)
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: s.to_string(),
            })
    }
}

// =============================================================================
// Access Level
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessLevel {
    Basic,
    Admin,
}

impl AccessLevel {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(AccessLevel::Basic),
            1 => Some(AccessLevel::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Basic => "Basic",
            AccessLevel::Admin => "Admin",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "basic" => Ok(AccessLevel::Basic),
            "admin" => Ok(AccessLevel::Admin),
            _ => Err(ParseEnumError {
                kind: "access level",
                value: s.to_string(),
            }),
        }
    }
}
