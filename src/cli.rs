use crate::config::{DEFAULT_DB_FILE, DEFAULT_EXPORT_DIR};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tm")]
#[command(about = "Team task tracker backed by SQLite")]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = "TM_DB", default_value = DEFAULT_DB_FILE)]
    pub db: PathBuf,

    /// Directory that receives CSV reports
    #[arg(long, global = true, env = "TM_EXPORT_DIR", default_value = DEFAULT_EXPORT_DIR)]
    pub export_dir: PathBuf,

    /// Command to run; the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive menu
    Menu,

    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
        /// Optional description
        #[arg(long)]
        desc: Option<String>,
        /// Priority, 1-5 by convention; any integer is stored
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        priority: i64,
        /// Team member to assign the task to
        #[arg(long)]
        assign: Option<String>,
    },

    /// List tasks
    List {
        /// Only tasks assigned to this member
        #[arg(long)]
        assignee: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List assigned tasks with their raw status
    Assigned {
        /// Only tasks assigned to this member
        #[arg(long)]
        assignee: Option<String>,
    },

    /// Show task details
    Show {
        /// Task ID
        id: i64,
    },

    /// Update status and/or due date
    Update {
        /// Task ID
        id: i64,
        /// New status
        #[arg(long)]
        status: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// Assign a task to a team member
    Assign {
        /// Task ID
        id: i64,
        /// Team member name
        member: String,
    },

    /// Mark a task completed
    Complete {
        /// Task ID
        id: i64,
    },

    /// Delete a task and its comments
    Delete {
        /// Task ID
        id: i64,
    },

    /// Comment on a task
    Comment {
        /// Task ID
        id: i64,
        /// Comment text
        text: String,
    },

    /// List comments
    Comments {
        /// Only comments on tasks assigned to this member
        #[arg(long)]
        assignee: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List team members with assigned tasks
    Members,

    /// Export all tasks and comments to reports.csv
    Report,

    /// Export one member's tasks to <member>.csv
    MemberReport {
        /// Team member name
        member: String,
    },
}
