use thiserror::Error;

/// All possible errors in the task tracker
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Cannot comment on task #{0}: no such task")]
    OrphanComment(i64),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),

    #[error("Invalid choice: '{0}'")]
    InvalidChoice(String),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TaskError>;
