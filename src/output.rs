//! User-facing text shared by the subcommands and the interactive menu.

use crate::models::{Comment, ReportOutcome, Task, TaskSummary, UpdateOutcome, DATE_FORMAT};

pub const NO_TASKS: &str = "No tasks available.";
pub const NO_COMMENTS: &str = "No comments available.";
pub const NO_MEMBERS: &str = "No team members have assigned tasks.";
pub const NO_REPORT_VALUES: &str = "No values recorded";
pub const MISSING_MEMBER: &str = "Please select a valid member name";

/// Which listing a task line is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColumn {
    /// Completion flag folded into the status
    Label,
    /// Stored status verbatim
    Raw,
}

pub fn task_line(task: &TaskSummary, column: StatusColumn) -> String {
    let status = match column {
        StatusColumn::Label => task.status_label(),
        StatusColumn::Raw => task.status.as_str(),
    };
    format!(
        "{} task title: {} - Due Date: {} - Priority: {} - Status: {}",
        task.id,
        task.title,
        task.due_date.format(DATE_FORMAT),
        task.priority,
        status
    )
}

pub fn task_lines(tasks: &[TaskSummary], column: StatusColumn) -> Vec<String> {
    if tasks.is_empty() {
        return vec![NO_TASKS.to_string()];
    }
    tasks.iter().map(|t| task_line(t, column)).collect()
}

pub fn task_detail(task: &Task) -> Vec<String> {
    vec![
        format!("[#{}] {}", task.id, task.title),
        format!("Description:  {}", task.description.as_deref().unwrap_or("(none)")),
        format!("Due:          {}", task.due_date.format(DATE_FORMAT)),
        format!("Priority:     {}", task.priority),
        format!(
            "Assigned to:  {}",
            task.assigned_to.as_deref().unwrap_or("(unassigned)")
        ),
        format!("Status:       {}", task.status),
    ]
}

pub fn comment_lines(comments: &[Comment]) -> Vec<String> {
    if comments.is_empty() {
        return vec![NO_COMMENTS.to_string()];
    }
    comments
        .iter()
        .map(|c| format!("Task {} commented: {}", c.task_id, c.comment))
        .collect()
}

pub fn member_lines(members: &[String]) -> Vec<String> {
    if members.is_empty() {
        return vec![NO_MEMBERS.to_string()];
    }
    members.iter().map(|m| format!("  - {m}")).collect()
}

pub fn created(task: &Task) -> String {
    format!("Task \"{}\" added successfully with ID {}.", task.title, task.id)
}

pub fn updated(id: i64, outcome: UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::NoChanges => "No updates provided.".to_string(),
        UpdateOutcome::Applied { .. } => format!("Task with ID {id} updated successfully."),
    }
}

pub fn full_report(outcome: &ReportOutcome) -> String {
    match outcome {
        ReportOutcome::Written { path, rows } => {
            format!("Report generated successfully: {} ({rows} rows)", path.display())
        }
        ReportOutcome::Empty => NO_REPORT_VALUES.to_string(),
        ReportOutcome::MissingMember => MISSING_MEMBER.to_string(),
    }
}

pub fn member_report(outcome: &ReportOutcome) -> String {
    match outcome {
        ReportOutcome::Written { path, rows } => {
            format!("Report generated successfully: {} ({rows} rows)", path.display())
        }
        ReportOutcome::Empty => NO_TASKS.to_string(),
        ReportOutcome::MissingMember => MISSING_MEMBER.to_string(),
    }
}
