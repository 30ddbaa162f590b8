//! CSV report export.
//!
//! Reports are read-only: they run a query, and when it returns rows they
//! write a CSV file into the export directory. An empty result writes nothing.

use crate::db::Database;
use crate::error::Result;
use crate::models::{ReportOutcome, DATE_FORMAT};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the whole-system report
pub const FULL_REPORT_FILE: &str = "reports.csv";

/// Extension given to per-member reports
pub const MEMBER_REPORT_EXT: &str = "csv";

const FULL_REPORT_HEADER: [&str; 10] = [
    "tasks.id",
    "title",
    "description",
    "due_date",
    "priority",
    "assigned_to",
    "status",
    "comments.id",
    "task_id",
    "comment",
];

const MEMBER_REPORT_HEADER: [&str; 5] = ["ID", "Title", "Due Date", "Priority", "Status"];

/// Write every task joined to its comments into `dir/reports.csv`, replacing any earlier file
pub fn generate_full_report(db: &Database, dir: &Path) -> Result<ReportOutcome> {
    let rows = db.full_report_rows()?;
    if rows.is_empty() {
        return Ok(ReportOutcome::Empty);
    }

    let path = dir.join(FULL_REPORT_FILE);
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(FULL_REPORT_HEADER)?;
    for row in &rows {
        writer.write_record([
            row.task_id.to_string(),
            row.title.clone(),
            row.description.clone().unwrap_or_default(),
            row.due_date.format(DATE_FORMAT).to_string(),
            row.priority.to_string(),
            row.assigned_to.clone().unwrap_or_default(),
            row.status.clone(),
            opt_to_string(row.comment_id),
            opt_to_string(row.comment_task_id),
            row.comment.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "full report written");
    Ok(ReportOutcome::Written {
        path,
        rows: rows.len(),
    })
}

/// Write the tasks assigned to one member into `dir/<member>.csv`
pub fn generate_member_report(
    db: &Database,
    dir: &Path,
    assigned_to: Option<&str>,
) -> Result<ReportOutcome> {
    let member = match assigned_to {
        Some(name) if !name.is_empty() => name,
        _ => return Ok(ReportOutcome::MissingMember),
    };

    let rows = db.member_report_rows(member)?;
    if rows.is_empty() {
        return Ok(ReportOutcome::Empty);
    }

    let path = member_report_path(dir, member);
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(MEMBER_REPORT_HEADER)?;
    for row in &rows {
        writer.write_record([
            row.id.to_string(),
            row.title.clone(),
            row.due_date.format(DATE_FORMAT).to_string(),
            row.priority.to_string(),
            row.status.clone(),
        ])?;
    }
    writer.flush()?;

    info!(member, path = %path.display(), rows = rows.len(), "member report written");
    Ok(ReportOutcome::Written {
        path,
        rows: rows.len(),
    })
}

/// Report path for a member. Path separators are replaced so the file stays inside `dir`.
pub fn member_report_path(dir: &Path, member: &str) -> PathBuf {
    let stem: String = member
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    dir.join(format!("{stem}.{MEMBER_REPORT_EXT}"))
}

fn opt_to_string(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
