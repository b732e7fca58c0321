//! CSV projection
//!
//! A read-only export of already-retrieved records. Never read back in.

use std::io::Write;

use crate::error::Result;
use crate::record::Record;

/// Header row of the CSV export
pub const CSV_HEADER: &str =
    "ID,FirstName,LastName,Position,Department,Salary,Email,Phone,HireDate,Status,ManagerID,Skills,AccessLevel";

/// Render one record as a CSV row (no trailing newline)
///
/// Enumerations use display names, the hire date is `YYYY-MM-DD`, and
/// skills are `;`-joined inside double quotes.
pub fn csv_row(record: &Record) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},{},\"{}\",{}",
        record.id,
        record.first_name,
        record.last_name,
        record.position,
        record.department,
        record.salary,
        record.email.as_deref().unwrap_or_default(),
        record.phone.as_deref().unwrap_or_default(),
        record.hire_date(),
        record.status,
        record.manager_id.as_deref().unwrap_or_default(),
        record.skills.join(";"),
        record.access_level,
    )
}

/// Write the header and one row per record
pub fn write_csv<W: Write>(writer: &mut W, records: &[Record]) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for record in records {
        writeln!(writer, "{}", csv_row(record))?;
    }
    Ok(())
}
