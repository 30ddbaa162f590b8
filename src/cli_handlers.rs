use crate::core::TaskTracker;
use crate::error::TaskError;
use crate::models::{parse_date, NewTask, TaskUpdate};
use crate::output::{self, StatusColumn};

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

/// Handle the add command
pub fn handle_add(
    tracker: &TaskTracker,
    title: &str,
    due: &str,
    desc: Option<&str>,
    priority: i64,
    assign: Option<&str>,
) -> Result<(), TaskError> {
    if title.trim().is_empty() {
        return Err(TaskError::EmptyField("Title"));
    }
    let mut task = NewTask::new(title, parse_date(due)?).priority(priority);
    if let Some(desc) = desc {
        task = task.description(desc);
    }
    if let Some(member) = assign.filter(|m| !m.is_empty()) {
        task = task.assigned_to(member);
    }

    let task = tracker.create_task(task)?;
    println!("{}", output::created(&task));
    Ok(())
}

/// Handle the list command
pub fn handle_list(
    tracker: &TaskTracker,
    assignee: Option<&str>,
    json: bool,
) -> Result<(), TaskError> {
    let tasks = tracker.list_tasks(assignee)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        print_lines(output::task_lines(&tasks, StatusColumn::Label));
    }
    Ok(())
}

/// Handle the assigned command
pub fn handle_assigned(tracker: &TaskTracker, assignee: Option<&str>) -> Result<(), TaskError> {
    let tasks = tracker.list_tasks(assignee)?;
    print_lines(output::task_lines(&tasks, StatusColumn::Raw));
    Ok(())
}

/// Handle the show command
pub fn handle_show(tracker: &TaskTracker, id: i64) -> Result<(), TaskError> {
    match tracker.get_task(id)? {
        Some(task) => print_lines(output::task_detail(&task)),
        None => println!("{}", output::NO_TASKS),
    }
    Ok(())
}

/// Handle the update command
pub fn handle_update(
    tracker: &TaskTracker,
    id: i64,
    status: Option<String>,
    due: Option<&str>,
) -> Result<(), TaskError> {
    let update = TaskUpdate {
        status,
        due_date: due.map(parse_date).transpose()?,
    };
    let outcome = tracker.update_task(id, update)?;
    println!("{}", output::updated(id, outcome));
    Ok(())
}

/// Handle the assign command
pub fn handle_assign(tracker: &TaskTracker, id: i64, member: &str) -> Result<(), TaskError> {
    tracker.assign_task(id, member)?;
    println!("Task with ID {id} assigned to {member}.");
    Ok(())
}

/// Handle the complete command
pub fn handle_complete(tracker: &TaskTracker, id: i64) -> Result<(), TaskError> {
    tracker.mark_completed(id)?;
    println!("Task with ID {id} marked as completed.");
    Ok(())
}

/// Handle the delete command
pub fn handle_delete(tracker: &TaskTracker, id: i64) -> Result<(), TaskError> {
    tracker.delete_task(id)?;
    println!("Task with ID {id} removed successfully.");
    Ok(())
}

/// Handle the comment command
pub fn handle_comment(tracker: &TaskTracker, id: i64, text: &str) -> Result<(), TaskError> {
    if text.trim().is_empty() {
        return Err(TaskError::EmptyField("Comment"));
    }
    tracker.add_comment(id, text)?;
    println!("Comment added to task with ID {id}.");
    Ok(())
}

/// Handle the comments command
pub fn handle_comments(
    tracker: &TaskTracker,
    assignee: Option<&str>,
    json: bool,
) -> Result<(), TaskError> {
    let comments = tracker.list_comments(assignee)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&comments)?);
    } else {
        print_lines(output::comment_lines(&comments));
    }
    Ok(())
}

/// Handle the members command
pub fn handle_members(tracker: &TaskTracker) -> Result<(), TaskError> {
    let members = tracker.distinct_assignees()?;
    print_lines(output::member_lines(&members));
    Ok(())
}

/// Handle the report command
pub fn handle_report(tracker: &TaskTracker) -> Result<(), TaskError> {
    let outcome = tracker.generate_full_report()?;
    println!("{}", output::full_report(&outcome));
    Ok(())
}

/// Handle the member-report command
pub fn handle_member_report(tracker: &TaskTracker, member: &str) -> Result<(), TaskError> {
    let outcome = tracker.generate_member_report(Some(member))?;
    println!("{}", output::member_report(&outcome));
    Ok(())
}
