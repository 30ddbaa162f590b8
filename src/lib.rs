pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod models;
pub mod output;
pub mod report;
pub mod shell;

pub use crate::core::TaskTracker;
pub use error::{Result, TaskError};
pub use models::*;
