use crate::error::{Result, TaskError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Status written by the complete action
pub const COMPLETED_STATUS: &str = "completed";

/// Date format used for input and for report output
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A task in the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: i64,
    pub assigned_to: Option<String>,
    pub status: String,
    /// Set false on insert and never written afterwards; `status` carries completion.
    pub completed: bool,
}

/// Listing projection of a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: i64,
    pub title: String,
    pub due_date: NaiveDate,
    pub priority: i64,
    pub status: String,
    pub completed: bool,
}

impl TaskSummary {
    /// Status shown by the task listing: the `completed` flag wins over `status`.
    pub fn status_label(&self) -> &str {
        if self.completed {
            "Completed"
        } else {
            &self.status
        }
    }
}

/// A free-text note attached to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub task_id: i64,
    pub comment: String,
}

/// New task input
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: i64,
    pub assigned_to: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        NewTask {
            title: title.into(),
            description: None,
            due_date,
            priority: 1,
            assigned_to: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn assigned_to(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = Some(assignee.into());
        self
    }
}

/// Partial task update. `None` leaves the column alone; `Some` is written as given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.due_date.is_none()
    }
}

/// Result of a partial update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing was supplied, so nothing was executed
    NoChanges,
    /// The statement ran; `rows` is zero when the id does not exist
    Applied { rows: usize },
}

/// One row of the full report: a task left-joined to one of its comments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub task_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: i64,
    pub assigned_to: Option<String>,
    pub status: String,
    pub comment_id: Option<i64>,
    pub comment_task_id: Option<i64>,
    pub comment: Option<String>,
}

/// One row of a per-member report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberReportRow {
    pub id: i64,
    pub title: String,
    pub due_date: NaiveDate,
    pub priority: i64,
    pub status: String,
}

/// What a report request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Written { path: PathBuf, rows: usize },
    /// The query matched nothing; no file was written
    Empty,
    /// A member report was requested without a member name
    MissingMember,
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| TaskError::InvalidDate(s.trim().to_string()))
}

/// Parse a task id or priority
pub fn parse_number(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| TaskError::InvalidNumber(s.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_follows_completed_flag() {
        let mut summary = TaskSummary {
            id: 1,
            title: "Ship release".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            priority: 2,
            status: "completed".into(),
            completed: false,
        };
        assert_eq!(summary.status_label(), "completed");

        summary.completed = true;
        assert_eq!(summary.status_label(), "Completed");
    }

    #[test]
    fn test_new_task_defaults() {
        let task = NewTask::new("Write docs", NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(task.priority, 1);
        assert!(task.description.is_none());
        assert!(task.assigned_to.is_none());
    }

    #[test]
    fn test_task_update_is_empty() {
        assert!(TaskUpdate::default().is_empty());
        let update = TaskUpdate {
            status: Some(String::new()),
            due_date: None,
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(parse_date("2023-02-29"), Err(TaskError::InvalidDate(_))));
        assert!(matches!(parse_date("01/02/2024"), Err(TaskError::InvalidDate(_))));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42").unwrap(), 42);
        assert!(matches!(parse_number("four"), Err(TaskError::InvalidNumber(s)) if s == "four"));
    }
}
