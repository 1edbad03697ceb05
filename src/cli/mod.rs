//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod log;
pub mod profile;

pub use backup::{handle_backup_command, BackupCommands};
pub use log::{handle_log_command, LogArgs};
pub use profile::{handle_profile_command, ProfileCommands};
