//! Numbered interactive menu.
//!
//! The shell owns prompting and input coercion. Every menu action is
//! dispatched to [`TaskTracker`]; a failing action is reported and the loop
//! carries on. End of input behaves like choosing Exit.

use crate::core::TaskTracker;
use crate::error::{Result, TaskError};
use crate::models::{parse_date, parse_number, NewTask, TaskUpdate};
use crate::output::{self, StatusColumn};
use std::io::{BufRead, Write};
use tracing::debug;

/// One entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddTask,
    ViewTasks,
    UpdateTask,
    AssignTask,
    ViewAssigned,
    MarkCompleted,
    DeleteTask,
    AddComment,
    ViewComments,
    GenerateReport,
    NotifyMembers,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 12] = [
        MenuChoice::AddTask,
        MenuChoice::ViewTasks,
        MenuChoice::UpdateTask,
        MenuChoice::AssignTask,
        MenuChoice::ViewAssigned,
        MenuChoice::MarkCompleted,
        MenuChoice::DeleteTask,
        MenuChoice::AddComment,
        MenuChoice::ViewComments,
        MenuChoice::GenerateReport,
        MenuChoice::NotifyMembers,
        MenuChoice::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::AddTask => "Add Task",
            MenuChoice::ViewTasks => "View Tasks",
            MenuChoice::UpdateTask => "Update Task Details",
            MenuChoice::AssignTask => "Assign Task",
            MenuChoice::ViewAssigned => "View Assigned Tasks",
            MenuChoice::MarkCompleted => "Mark Task Completed",
            MenuChoice::DeleteTask => "Delete Task",
            MenuChoice::AddComment => "Add Task Comment",
            MenuChoice::ViewComments => "View Task Comments",
            MenuChoice::GenerateReport => "Generate Reports",
            MenuChoice::NotifyMembers => "Notify Team Members",
            MenuChoice::Exit => "Exit",
        }
    }
}

impl TryFrom<&str> for MenuChoice {
    type Error = TaskError;

    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        let s = s.trim();
        s.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| MenuChoice::ALL.get(i).copied())
            .ok_or_else(|| TaskError::InvalidChoice(s.to_string()))
    }
}

/// Interactive session over any line-oriented input and output
pub struct Shell<'a, R, W> {
    tracker: &'a TaskTracker,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(tracker: &'a TaskTracker, input: R, output: W) -> Self {
        Shell {
            tracker,
            input,
            output,
        }
    }

    /// Run until Exit or end of input. Only a failure to write to the output ends the loop early.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let message = format!("Enter your choice (1-{}): ", MenuChoice::ALL.len());
            let Some(line) = self.prompt(&message)? else {
                writeln!(self.output)?;
                break;
            };

            let choice = match MenuChoice::try_from(line.as_str()) {
                Ok(choice) => choice,
                Err(e) => {
                    writeln!(self.output, "{e}")?;
                    continue;
                }
            };

            if choice == MenuChoice::Exit {
                writeln!(self.output, "Exiting Task Management System. Have a great day!")?;
                break;
            }

            debug!(?choice, "menu selection");
            if let Err(e) = self.dispatch(choice) {
                writeln!(self.output, "Error: {e}")?;
            }
        }
        Ok(())
    }

    /// Consume the shell and hand back its output sink
    pub fn into_output(self) -> W {
        self.output
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "===== Task Management System Menu =====")?;
        for (i, choice) in MenuChoice::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, choice.label())?;
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::AddTask => self.add_task(),
            MenuChoice::ViewTasks => {
                let Some(member) =
                    self.prompt("Enter team member's name (leave blank to view all tasks): ")?
                else {
                    return Ok(());
                };
                let tasks = self.tracker.list_tasks(Some(member.as_str()))?;
                self.print_lines(output::task_lines(&tasks, StatusColumn::Label))
            }
            MenuChoice::UpdateTask => {
                self.show_all_tasks()?;
                let Some(id) = self.prompt_id("Enter the ID of the task to update: ")? else {
                    return Ok(());
                };
                let Some(status) =
                    self.prompt("Enter new status (leave blank to keep current): ")?
                else {
                    return Ok(());
                };
                let Some(due) = self
                    .prompt("Enter new due date (YYYY-MM-DD, leave blank to keep current): ")?
                else {
                    return Ok(());
                };
                let update = TaskUpdate {
                    status: blank_to_none(status),
                    due_date: blank_to_none(due).map(|d| parse_date(&d)).transpose()?,
                };
                let outcome = self.tracker.update_task(id, update)?;
                writeln!(self.output, "{}", output::updated(id, outcome))?;
                Ok(())
            }
            MenuChoice::AssignTask => {
                self.show_all_tasks()?;
                let Some(id) = self.prompt_id("Enter the ID of the task to assign: ")? else {
                    return Ok(());
                };
                let Some(member) = self.prompt("Enter the team member's name: ")? else {
                    return Ok(());
                };
                self.tracker.assign_task(id, &member)?;
                writeln!(self.output, "Task with ID {id} assigned to {member}.")?;
                Ok(())
            }
            MenuChoice::ViewAssigned => {
                let Some(member) = self.prompt(
                    "Enter the team member's name (leave blank to get all assigned tasks): ",
                )?
                else {
                    return Ok(());
                };
                let tasks = self.tracker.list_tasks(Some(member.as_str()))?;
                self.print_lines(output::task_lines(&tasks, StatusColumn::Raw))
            }
            MenuChoice::MarkCompleted => {
                self.show_all_tasks()?;
                let Some(id) =
                    self.prompt_id("Enter the ID of the task to mark as completed: ")?
                else {
                    return Ok(());
                };
                self.tracker.mark_completed(id)?;
                writeln!(self.output, "Task with ID {id} marked as completed.")?;
                Ok(())
            }
            MenuChoice::DeleteTask => {
                self.show_all_tasks()?;
                let Some(id) = self.prompt_id("Enter the ID of the task to remove: ")? else {
                    return Ok(());
                };
                self.tracker.delete_task(id)?;
                writeln!(self.output, "Task with ID {id} removed successfully.")?;
                Ok(())
            }
            MenuChoice::AddComment => {
                self.show_all_tasks()?;
                let Some(id) =
                    self.prompt_id("Enter the ID of the task to add a comment: ")?
                else {
                    return Ok(());
                };
                let Some(comment) = self.prompt("Enter the comment: ")? else {
                    return Ok(());
                };
                if comment.is_empty() {
                    return Err(TaskError::EmptyField("Comment"));
                }
                self.tracker.add_comment(id, &comment)?;
                writeln!(self.output, "Comment added to task with ID {id}.")?;
                Ok(())
            }
            MenuChoice::ViewComments => {
                let Some(member) = self
                    .prompt("Enter team member's name (leave blank to view all comments): ")?
                else {
                    return Ok(());
                };
                let comments = self.tracker.list_comments(Some(member.as_str()))?;
                self.print_lines(output::comment_lines(&comments))
            }
            MenuChoice::GenerateReport => {
                writeln!(self.output, "Generating report...")?;
                let outcome = self.tracker.generate_full_report()?;
                writeln!(self.output, "{}", output::full_report(&outcome))?;
                Ok(())
            }
            MenuChoice::NotifyMembers => {
                let members = self.tracker.distinct_assignees()?;
                self.print_lines(output::member_lines(&members))?;
                let Some(member) =
                    self.prompt("Enter the team member name to generate their task report: ")?
                else {
                    return Ok(());
                };
                let outcome = self.tracker.generate_member_report(Some(member.as_str()))?;
                writeln!(self.output, "{}", output::member_report(&outcome))?;
                Ok(())
            }
            MenuChoice::Exit => Ok(()),
        }
    }

    fn add_task(&mut self) -> Result<()> {
        // All five answers are read before any of them is validated
        let Some(title) = self.prompt("Enter task title: ")? else {
            return Ok(());
        };
        let Some(description) = self.prompt("Enter task description: ")? else {
            return Ok(());
        };
        let Some(due) = self.prompt("Enter due date (YYYY-MM-DD): ")? else {
            return Ok(());
        };
        let Some(priority) = self.prompt("Enter priority (1-5): ")? else {
            return Ok(());
        };
        let Some(member) = self.prompt("Assign task to (leave blank for unassigned): ")? else {
            return Ok(());
        };

        if title.is_empty() {
            return Err(TaskError::EmptyField("Title"));
        }
        let due_date = parse_date(&due)?;
        let priority = parse_number(&priority)?;

        let mut task = NewTask::new(title, due_date).priority(priority);
        if let Some(description) = blank_to_none(description) {
            task = task.description(description);
        }
        if let Some(member) = blank_to_none(member) {
            task = task.assigned_to(member);
        }

        let task = self.tracker.create_task(task)?;
        writeln!(self.output, "{}", output::created(&task))?;
        Ok(())
    }

    fn show_all_tasks(&mut self) -> Result<()> {
        let tasks = self.tracker.list_tasks(None)?;
        self.print_lines(output::task_lines(&tasks, StatusColumn::Label))
    }

    fn print_lines(&mut self, lines: Vec<String>) -> Result<()> {
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    /// Print `message` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_id(&mut self, message: &str) -> Result<Option<i64>> {
        self.prompt(message)?.map(|s| parse_number(&s)).transpose()
    }
}

fn blank_to_none(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TaskTracker) {
        let dir = TempDir::new().unwrap();
        let db = Database::open_in_memory().unwrap();
        let tracker = TaskTracker::with_database(db, dir.path()).unwrap();
        (dir, tracker)
    }

    fn run_session(tracker: &TaskTracker, script: &str) -> String {
        let mut shell = Shell::new(tracker, Cursor::new(script.to_string()), Vec::new());
        shell.run().unwrap();
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[test]
    fn test_menu_choice_parsing() {
        assert_eq!(MenuChoice::try_from("1").unwrap(), MenuChoice::AddTask);
        assert_eq!(MenuChoice::try_from(" 12 ").unwrap(), MenuChoice::Exit);
        assert!(matches!(MenuChoice::try_from("0"), Err(TaskError::InvalidChoice(_))));
        assert!(matches!(MenuChoice::try_from("13"), Err(TaskError::InvalidChoice(_))));
        assert!(matches!(MenuChoice::try_from("add"), Err(TaskError::InvalidChoice(_))));
    }

    #[test]
    fn test_exit_and_eof_end_session() {
        let (_dir, tracker) = setup();
        let out = run_session(&tracker, "12\n");
        assert!(out.contains("Have a great day!"));

        let out = run_session(&tracker, "");
        assert!(out.contains("1. Add Task"));
        assert!(out.contains("12. Exit"));
    }

    #[test]
    fn test_add_and_view_tasks() {
        let (_dir, tracker) = setup();
        let out = run_session(
            &tracker,
            "1\nShip release\n\n2024-01-01\n2\nalice\n2\nalice\n12\n",
        );

        assert!(out.contains("Task \"Ship release\" added successfully with ID 1."));
        assert!(out.contains(
            "1 task title: Ship release - Due Date: 2024-01-01 - Priority: 2 - Status: Pending"
        ));

        let task = tracker.get_task(1).unwrap().unwrap();
        assert_eq!(task.assigned_to.as_deref(), Some("alice"));
        assert!(task.description.is_none());
    }

    #[test]
    fn test_bad_input_keeps_session_alive() {
        let (_dir, tracker) = setup();
        let out = run_session(
            &tracker,
            "1\nTitle\ndesc\nnot-a-date\n2\n\nfoo\n3\nabc\n12\n",
        );

        assert!(out.contains("Error: Invalid date 'not-a-date', expected YYYY-MM-DD"));
        assert!(out.contains("Invalid choice: 'foo'"));
        assert!(out.contains("Error: Invalid number: 'abc'"));
        assert!(out.contains("Have a great day!"));
        assert!(tracker.list_tasks(None).unwrap().is_empty());
    }

    #[test]
    fn test_empty_title_consumes_remaining_prompts() {
        let (_dir, tracker) = setup();
        let out = run_session(&tracker, "1\n\ndesc\n2024-01-01\n2\nalice\n12\n");

        assert!(out.contains("Error: Title cannot be empty"));
        assert!(out.contains("Assign task to (leave blank for unassigned): "));
        assert!(!out.contains("Invalid choice"));
        assert!(out.contains("Have a great day!"));
        assert!(tracker.list_tasks(None).unwrap().is_empty());
    }

    #[test]
    fn test_update_with_blank_fields_is_noop() {
        let (_dir, tracker) = setup();
        let task = tracker
            .create_task(NewTask::new("A", parse_date("2024-01-01").unwrap()))
            .unwrap();

        let out = run_session(&tracker, "3\n1\n\n\n12\n");
        assert!(out.contains("No updates provided."));
        assert_eq!(tracker.get_task(task.id).unwrap().unwrap(), task);
    }

    #[test]
    fn test_comment_on_missing_task_reports_error() {
        let (_dir, tracker) = setup();
        let out = run_session(&tracker, "8\n5\nhello\n9\n\n12\n");
        assert!(out.contains("Error: Cannot comment on task #5: no such task"));
        assert!(out.contains(output::NO_COMMENTS));
    }

    #[test]
    fn test_complete_assign_delete_flow() {
        let (_dir, tracker) = setup();
        tracker
            .create_task(NewTask::new("A", parse_date("2024-01-01").unwrap()))
            .unwrap();

        let out = run_session(&tracker, "6\n1\n4\n1\nbob\n5\nbob\n7\n1\n2\n\n12\n");
        assert!(out.contains("Task with ID 1 marked as completed."));
        assert!(out.contains("Task with ID 1 assigned to bob."));
        assert!(out.contains("Status: completed"));
        assert!(out.contains("Task with ID 1 removed successfully."));
        assert!(out.ends_with(&format!(
            "{}\n\n===== Task Management System Menu =====\n{}Enter your choice (1-12): Exiting Task Management System. Have a great day!\n",
            output::NO_TASKS,
            MenuChoice::ALL
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}. {}\n", i + 1, c.label()))
                .collect::<String>()
        )));
    }

    #[test]
    fn test_reports_from_menu() {
        let (dir, tracker) = setup();
        let out = run_session(&tracker, "10\n11\n\n12\n");
        assert!(out.contains(output::NO_REPORT_VALUES));
        assert!(out.contains(output::NO_MEMBERS));
        assert!(out.contains(output::MISSING_MEMBER));

        tracker
            .create_task(NewTask::new("A", parse_date("2024-01-01").unwrap()).assigned_to("alice"))
            .unwrap();
        let out = run_session(&tracker, "10\n11\nalice\n12\n");
        assert!(out.contains("  - alice"));
        assert!(dir.path().join("reports.csv").exists());
        assert!(dir.path().join("alice.csv").exists());
    }
}
