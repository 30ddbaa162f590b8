use crate::db::Database;
use crate::error::Result;
use crate::models::{
    Comment, NewTask, ReportOutcome, Task, TaskSummary, TaskUpdate, UpdateOutcome,
};
use crate::report;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Core business logic shared by the subcommands and the interactive shell
pub struct TaskTracker {
    db: Database,
    export_dir: PathBuf,
}

impl TaskTracker {
    /// Open the database at `path` and make sure the schema exists
    pub fn open_at<P: AsRef<Path>>(path: P, export_dir: impl Into<PathBuf>) -> Result<Self> {
        let db = Database::open(path)?;
        db.init()?;
        Ok(TaskTracker {
            db,
            export_dir: export_dir.into(),
        })
    }

    /// Wrap an already opened database, creating the schema if needed
    pub fn with_database(db: Database, export_dir: impl Into<PathBuf>) -> Result<Self> {
        db.init()?;
        Ok(TaskTracker {
            db,
            export_dir: export_dir.into(),
        })
    }

    // ==================== Task Operations ====================

    pub fn create_task(&self, task: NewTask) -> Result<Task> {
        let task = self.db.create_task(&task)?;
        info!(id = task.id, title = %task.title, "task created");
        Ok(task)
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.db.get_task(id)
    }

    /// List tasks; an absent or empty assignee lists everything
    pub fn list_tasks(&self, assigned_to: Option<&str>) -> Result<Vec<TaskSummary>> {
        self.db.list_tasks(non_empty(assigned_to))
    }

    pub fn update_task(&self, id: i64, update: TaskUpdate) -> Result<UpdateOutcome> {
        if update.is_empty() {
            return Ok(UpdateOutcome::NoChanges);
        }
        let rows = self.db.update_task(id, &update)?;
        log_mutation("update", id, rows);
        Ok(UpdateOutcome::Applied { rows })
    }

    pub fn assign_task(&self, id: i64, assigned_to: &str) -> Result<usize> {
        let rows = self.db.assign_task(id, assigned_to)?;
        log_mutation("assign", id, rows);
        Ok(rows)
    }

    pub fn mark_completed(&self, id: i64) -> Result<usize> {
        let rows = self.db.mark_completed(id)?;
        log_mutation("complete", id, rows);
        Ok(rows)
    }

    pub fn delete_task(&self, id: i64) -> Result<usize> {
        let rows = self.db.delete_task(id)?;
        log_mutation("delete", id, rows);
        Ok(rows)
    }

    pub fn distinct_assignees(&self) -> Result<Vec<String>> {
        self.db.distinct_assignees()
    }

    // ==================== Comment Operations ====================

    pub fn add_comment(&self, task_id: i64, comment: &str) -> Result<Comment> {
        let comment = self.db.add_comment(task_id, comment)?;
        info!(id = comment.id, task_id, "comment added");
        Ok(comment)
    }

    pub fn list_comments(&self, assigned_to: Option<&str>) -> Result<Vec<Comment>> {
        self.db.list_comments(non_empty(assigned_to))
    }

    // ==================== Reports ====================

    pub fn generate_full_report(&self) -> Result<ReportOutcome> {
        report::generate_full_report(&self.db, &self.export_dir)
    }

    pub fn generate_member_report(&self, assigned_to: Option<&str>) -> Result<ReportOutcome> {
        report::generate_member_report(&self.db, &self.export_dir, assigned_to)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn log_mutation(action: &str, id: i64, rows: usize) {
    if rows == 0 {
        warn!(action, id, "no task with this id; nothing changed");
    } else {
        info!(action, id, "task updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TaskTracker) {
        let dir = TempDir::new().unwrap();
        let db = Database::open_in_memory().unwrap();
        let tracker = TaskTracker::with_database(db, dir.path()).unwrap();
        (dir, tracker)
    }

    fn new_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_ids_unique_and_stable() {
        let (_dir, tracker) = setup();
        let ids: Vec<i64> = (0..5)
            .map(|i| {
                tracker
                    .create_task(NewTask::new(format!("T{i}"), new_year()))
                    .unwrap()
                    .id
            })
            .collect();

        let unique: std::collections::HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());

        let listed: Vec<i64> = tracker.list_tasks(None).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(listed, ids);
        for id in ids {
            assert_eq!(tracker.get_task(id).unwrap().unwrap().id, id);
        }
    }

    #[test]
    fn test_empty_update_is_noop() {
        let (_dir, tracker) = setup();
        let task = tracker.create_task(NewTask::new("A", new_year())).unwrap();

        let outcome = tracker.update_task(task.id, TaskUpdate::default()).unwrap();
        assert_eq!(outcome, UpdateOutcome::NoChanges);
        assert_eq!(tracker.get_task(task.id).unwrap().unwrap(), task);
    }

    #[test]
    fn test_update_missing_id_is_silent() {
        let (_dir, tracker) = setup();
        let outcome = tracker
            .update_task(
                7,
                TaskUpdate {
                    status: Some("Blocked".into()),
                    due_date: None,
                },
            )
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Applied { rows: 0 });
    }

    #[test]
    fn test_mark_completed_leaves_flag_false() {
        let (_dir, tracker) = setup();
        let task = tracker.create_task(NewTask::new("A", new_year())).unwrap();

        assert_eq!(tracker.mark_completed(task.id).unwrap(), 1);

        let reloaded = tracker.get_task(task.id).unwrap().unwrap();
        assert_eq!(reloaded.status, "completed");
        assert!(!reloaded.completed);

        let summary = &tracker.list_tasks(None).unwrap()[0];
        assert_eq!(summary.status_label(), "completed");
    }

    #[test]
    fn test_assign_moves_task_between_members() {
        let (_dir, tracker) = setup();
        let task = tracker
            .create_task(
                NewTask::new("Ship release", new_year())
                    .description("")
                    .priority(2)
                    .assigned_to("alice"),
            )
            .unwrap();

        let alice = tracker.list_tasks(Some("alice")).unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].id, task.id);
        assert_eq!(alice[0].title, "Ship release");
        assert_eq!(alice[0].due_date, new_year());
        assert_eq!(alice[0].priority, 2);
        assert_eq!(alice[0].status, "Pending");

        tracker.assign_task(task.id, "bob").unwrap();
        assert!(tracker.list_tasks(Some("alice")).unwrap().is_empty());
        let bob = tracker.list_tasks(Some("bob")).unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].id, task.id);
    }

    #[test]
    fn test_empty_assignee_lists_everything() {
        let (_dir, tracker) = setup();
        tracker
            .create_task(NewTask::new("A", new_year()).assigned_to("alice"))
            .unwrap();
        tracker.create_task(NewTask::new("B", new_year())).unwrap();
        assert_eq!(tracker.list_tasks(Some("")).unwrap().len(), 2);
    }

    #[test]
    fn test_deleted_task_absent_from_report() {
        let (_dir, tracker) = setup();
        let doomed = tracker.create_task(NewTask::new("Doomed", new_year())).unwrap();
        let kept = tracker.create_task(NewTask::new("Kept", new_year())).unwrap();
        tracker.add_comment(doomed.id, "one").unwrap();
        tracker.add_comment(doomed.id, "two").unwrap();

        assert_eq!(tracker.delete_task(doomed.id).unwrap(), 1);

        let rows = tracker.db.full_report_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task_id, kept.id);
        assert!(rows
            .iter()
            .all(|r| r.task_id != doomed.id && r.comment_task_id != Some(doomed.id)));
    }

    #[test]
    fn test_reports_go_to_export_dir() {
        let (dir, tracker) = setup();
        tracker
            .create_task(NewTask::new("A", new_year()).assigned_to("alice"))
            .unwrap();

        let outcome = tracker.generate_member_report(Some("alice")).unwrap();
        assert!(matches!(outcome, ReportOutcome::Written { rows: 1, .. }));
        assert!(dir.path().join("alice.csv").exists());

        tracker.generate_full_report().unwrap();
        assert!(dir.path().join("reports.csv").exists());
    }
}
