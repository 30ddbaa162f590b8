//! Runtime configuration.
//!
//! Values come from command-line flags, then the `TM_DB` / `TM_EXPORT_DIR`
//! environment variables, then the defaults below. clap does the layering.

use crate::cli::Cli;
use crate::core::TaskTracker;
use crate::error::Result;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_DB_FILE: &str = "tm.db";
pub const DEFAULT_EXPORT_DIR: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            db_path: cli.db.clone(),
            export_dir: cli.export_dir.clone(),
        }
    }

    /// Open the configured database, creating the schema when missing
    pub fn open_tracker(&self) -> Result<TaskTracker> {
        debug!(
            db = %self.db_path.display(),
            export_dir = %self.export_dir.display(),
            "opening tracker"
        );
        TaskTracker::open_at(&self.db_path, self.export_dir.clone())
    }
}
