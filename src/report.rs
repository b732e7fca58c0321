//! Reports
//!
//! Read-only analytics over records already retrieved from a store
//! (usually `store.get_all()`). Nothing here touches the store.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::record::{Department, Record, Status};

// =============================================================================
// Salary Statistics
// =============================================================================

/// Salary bands: label and exclusive upper bound (the last band is open)
pub const SALARY_BANDS: [(&str, f64); 6] = [
    ("<$30K", 30_000.0),
    ("$30K-50K", 50_000.0),
    ("$50K-75K", 75_000.0),
    ("$75K-100K", 100_000.0),
    ("$100K-150K", 150_000.0),
    (">$150K", f64::INFINITY),
];

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryReport {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// One entry per [`SALARY_BANDS`] band, in order
    pub bands: Vec<(&'static str, usize)>,
}

impl SalaryReport {
    /// None when there are no records
    pub fn from_records(records: &[Record]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let mut salaries: Vec<f64> = records.iter().map(|r| r.salary).collect();
        salaries.sort_by(f64::total_cmp);

        let count = salaries.len();
        let total: f64 = salaries.iter().sum();
        let median = if count % 2 == 0 {
            (salaries[count / 2 - 1] + salaries[count / 2]) / 2.0
        } else {
            salaries[count / 2]
        };

        let mut bands: Vec<(&'static str, usize)> =
            SALARY_BANDS.iter().map(|(label, _)| (*label, 0)).collect();
        for salary in &salaries {
            let band = SALARY_BANDS
                .iter()
                .position(|(_, upper)| salary < upper)
                .unwrap_or(SALARY_BANDS.len() - 1);
            bands[band].1 += 1;
        }

        Some(Self {
            count,
            total,
            mean: total / count as f64,
            median,
            min: salaries[0],
            max: salaries[count - 1],
            bands,
        })
    }
}

// =============================================================================
// Department / Status / Skills
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentSummary {
    pub department: Department,
    pub headcount: usize,
    pub total_salary: f64,
    pub average_salary: f64,
}

/// One summary per department that has at least one record, in ordinal order
pub fn department_summary(records: &[Record]) -> Vec<DepartmentSummary> {
    let mut by_department: BTreeMap<Department, (usize, f64)> = BTreeMap::new();
    for record in records {
        let entry = by_department.entry(record.department).or_default();
        entry.0 += 1;
        entry.1 += record.salary;
    }

    by_department
        .into_iter()
        .map(|(department, (headcount, total_salary))| DepartmentSummary {
            department,
            headcount,
            total_salary,
            average_salary: total_salary / headcount as f64,
        })
        .collect()
}

/// Count per status; every status is listed, zero counts included
pub fn status_breakdown(records: &[Record]) -> Vec<(Status, usize)> {
    Status::ALL
        .iter()
        .map(|&status| {
            let count = records.iter().filter(|r| r.status == status).count();
            (status, count)
        })
        .collect()
}

/// Occurrences per skill tag, most common first, ties by tag
pub fn skill_frequencies(records: &[Record]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for skill in records.iter().flat_map(|r| r.skills.iter()) {
        *counts.entry(skill.as_str()).or_default() += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(skill, count)| (skill.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

// =============================================================================
// Management Hierarchy
// =============================================================================

/// A record and everyone who reports to it
#[derive(Debug, Clone, PartialEq)]
pub struct ReportNode {
    pub id: String,
    pub name: String,
    pub position: String,
    pub reports: Vec<ReportNode>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hierarchy {
    /// Managers present in the record set who have no manager themselves
    pub roots: Vec<ReportNode>,

    /// Manager ids referenced but not present, with their direct-report count
    pub external_managers: Vec<(String, usize)>,
}

/// Build the reporting tree
///
/// Manager references are not foreign keys, so a reference may point at a
/// missing record (listed as external) or form a cycle (cut at the first
/// repeated id).
pub fn management_hierarchy(records: &[Record]) -> Hierarchy {
    let by_id: HashMap<&str, &Record> = records.iter().map(|r| (r.id.as_str(), r)).collect();

    let mut reports_to: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in records {
        if let Some(manager) = record.manager_id.as_deref() {
            reports_to.entry(manager).or_default().push(record.id.as_str());
        }
    }
    for subordinates in reports_to.values_mut() {
        subordinates.sort_unstable();
    }

    let mut hierarchy = Hierarchy::default();
    for (&manager, subordinates) in &reports_to {
        match by_id.get(manager) {
            Some(&record) if record.manager_id.is_none() => {
                let mut visited = HashSet::new();
                hierarchy
                    .roots
                    .push(build_node(record, &by_id, &reports_to, &mut visited));
            }
            Some(_) => {}
            None => hierarchy
                .external_managers
                .push((manager.to_string(), subordinates.len())),
        }
    }
    hierarchy
}

fn build_node<'a>(
    record: &'a Record,
    by_id: &HashMap<&'a str, &'a Record>,
    reports_to: &BTreeMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
) -> ReportNode {
    visited.insert(record.id.as_str());

    let mut reports = Vec::new();
    if let Some(subordinates) = reports_to.get(record.id.as_str()) {
        for id in subordinates {
            if visited.contains(id) {
                continue;
            }
            if let Some(&sub) = by_id.get(id) {
                reports.push(build_node(sub, by_id, reports_to, visited));
            }
        }
    }

    ReportNode {
        id: record.id.clone(),
        name: record.full_name(),
        position: record.position.clone(),
        reports,
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_reports(
            f: &mut fmt::Formatter<'_>,
            node: &ReportNode,
            depth: usize,
        ) -> fmt::Result {
            for sub in &node.reports {
                writeln!(
                    f,
                    "{}├─ {} ({}) - {}",
                    "  ".repeat(depth),
                    sub.name,
                    sub.id,
                    sub.position
                )?;
                write_reports(f, sub, depth + 1)?;
            }
            Ok(())
        }

        for root in &self.roots {
            writeln!(f, "{} ({}) - {}", root.name, root.id, root.position)?;
            write_reports(f, root, 1)?;
            writeln!(f)?;
        }
        writeln!(f, "External/Missing Managers:")?;
        for (id, count) in &self.external_managers {
            writeln!(f, "  {} (manages {} employees)", id, count)?;
        }
        Ok(())
    }
}
