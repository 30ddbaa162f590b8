use crate::error::{Result, TaskError};
use crate::models::{
    Comment, MemberReportRow, NewTask, ReportRow, Task, TaskSummary, TaskUpdate, COMPLETED_STATUS,
};
use rusqlite::{Connection, OptionalExtension, Row, ToSql};
use std::path::Path;
use tracing::debug;

/// Database handle. The connection closes when the handle is dropped.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database connection
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "opening database");
        let conn = Connection::open(path)?;
        Self::configure(conn)
    }

    /// Open an in-memory database for testing
    pub fn open_in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        // Cascading comment deletes depend on this
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Database { conn })
    }

    /// Create the schema if it does not exist yet
    pub fn init(&self) -> Result<()> {
        self.create_tables()?;
        self.create_indexes()?;
        Ok(())
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                due_date TEXT NOT NULL,
                priority INTEGER DEFAULT 1,
                assigned_to TEXT,
                status TEXT DEFAULT 'Pending',
                completed INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                comment TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn create_indexes(&self) -> Result<()> {
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_assigned_to ON tasks(assigned_to)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_comments_task_id ON comments(task_id)",
            [],
        )?;
        Ok(())
    }

    // ==================== Task Operations ====================

    pub fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.conn.execute(
            "INSERT INTO tasks (title, description, due_date, priority, assigned_to, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &task.title,
                &task.description,
                task.due_date,
                task.priority,
                &task.assigned_to,
                false,
            ),
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, "inserted task");
        self.get_task(id)?
            .ok_or(TaskError::Db(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.conn
            .query_row(
                "SELECT id, title, description, due_date, priority, assigned_to, status, completed
                 FROM tasks WHERE id = ?1",
                [id],
                task_from_row,
            )
            .optional()
            .map_err(|e| e.into())
    }

    /// Task summaries ordered by id, optionally filtered by exact assignee
    pub fn list_tasks(&self, assigned_to: Option<&str>) -> Result<Vec<TaskSummary>> {
        let tasks = match assigned_to {
            Some(assignee) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, title, due_date, priority, status, completed
                     FROM tasks WHERE assigned_to = ?1
                     ORDER BY id",
                )?;
                let rows = stmt.query_map([assignee], summary_from_row)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, title, due_date, priority, status, completed
                     FROM tasks
                     ORDER BY id",
                )?;
                let rows = stmt.query_map([], summary_from_row)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(tasks)
    }

    /// Write only the fields present in `update` in a single statement.
    /// Returns the number of rows touched; an empty update executes nothing.
    pub fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<usize> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(status) = &update.status {
            clauses.push("status = ?");
            values.push(status);
        }
        if let Some(due_date) = &update.due_date {
            clauses.push("due_date = ?");
            values.push(due_date);
        }
        if clauses.is_empty() {
            return Ok(0);
        }
        values.push(&id);

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", clauses.join(", "));
        debug!(%sql, "updating task");
        let rows = self.conn.execute(&sql, values.as_slice())?;
        Ok(rows)
    }

    pub fn assign_task(&self, id: i64, assigned_to: &str) -> Result<usize> {
        let rows = self.conn.execute(
            "UPDATE tasks SET assigned_to = ?1 WHERE id = ?2",
            (assigned_to, id),
        )?;
        Ok(rows)
    }

    /// Set the status literal only; the `completed` column is left as is
    pub fn mark_completed(&self, id: i64) -> Result<usize> {
        let rows = self.conn.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            (COMPLETED_STATUS, id),
        )?;
        Ok(rows)
    }

    pub fn delete_task(&self, id: i64) -> Result<usize> {
        let rows = self.conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        Ok(rows)
    }

    pub fn distinct_assignees(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT assigned_to FROM tasks
             WHERE assigned_to IS NOT NULL AND assigned_to != ''
             ORDER BY assigned_to",
        )?;

        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
        names
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    // ==================== Comment Operations ====================

    /// Insert a comment. The task is not looked up first; the foreign key rejects orphans.
    pub fn add_comment(&self, task_id: i64, comment: &str) -> Result<Comment> {
        match self.conn.execute(
            "INSERT INTO comments (task_id, comment) VALUES (?1, ?2)",
            (task_id, comment),
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                return Err(TaskError::OrphanComment(task_id));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Comment {
            id: self.conn.last_insert_rowid(),
            task_id,
            comment: comment.to_string(),
        })
    }

    /// Comments ordered by id; with an assignee, only those on tasks assigned to them
    pub fn list_comments(&self, assigned_to: Option<&str>) -> Result<Vec<Comment>> {
        let comments = match assigned_to {
            Some(assignee) => {
                let mut stmt = self.conn.prepare(
                    "SELECT c.id, c.task_id, c.comment
                     FROM comments c
                     JOIN tasks t ON t.id = c.task_id
                     WHERE t.assigned_to = ?1
                     ORDER BY c.id",
                )?;
                let rows = stmt.query_map([assignee], comment_from_row)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT id, task_id, comment FROM comments ORDER BY id")?;
                let rows = stmt.query_map([], comment_from_row)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(comments)
    }

    // ==================== Report Queries ====================

    /// Every task left-joined to its comments
    pub fn full_report_rows(&self) -> Result<Vec<ReportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.title, t.description, t.due_date, t.priority, t.assigned_to,
                    t.status, c.id, c.task_id, c.comment
             FROM tasks t
             LEFT JOIN comments c ON t.id = c.task_id
             ORDER BY t.id, c.id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ReportRow {
                task_id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                due_date: row.get(3)?,
                priority: row.get(4)?,
                assigned_to: row.get(5)?,
                status: row.get(6)?,
                comment_id: row.get(7)?,
                comment_task_id: row.get(8)?,
                comment: row.get(9)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    pub fn member_report_rows(&self, assigned_to: &str) -> Result<Vec<MemberReportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, due_date, priority, status
             FROM tasks WHERE assigned_to = ?1
             ORDER BY id",
        )?;

        let rows = stmt.query_map([assigned_to], |row| {
            Ok(MemberReportRow {
                id: row.get(0)?,
                title: row.get(1)?,
                due_date: row.get(2)?,
                priority: row.get(3)?,
                status: row.get(4)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }
}

// ==================== Row Parsers ====================

fn task_from_row(row: &Row) -> std::result::Result<Task, rusqlite::Error> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        due_date: row.get(3)?,
        priority: row.get::<_, Option<i64>>(4)?.unwrap_or(1),
        assigned_to: row.get(5)?,
        status: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        completed: row.get(7)?,
    })
}

fn summary_from_row(row: &Row) -> std::result::Result<TaskSummary, rusqlite::Error> {
    Ok(TaskSummary {
        id: row.get(0)?,
        title: row.get(1)?,
        due_date: row.get(2)?,
        priority: row.get::<_, Option<i64>>(3)?.unwrap_or(1),
        status: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        completed: row.get(5)?,
    })
}

fn comment_from_row(row: &Row) -> std::result::Result<Comment, rusqlite::Error> {
    Ok(Comment {
        id: row.get(0)?,
        task_id: row.get(1)?,
        comment: row.get(2)?,
    })
}
