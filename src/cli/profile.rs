//! Profile CLI commands
//!
//! Implements CLI commands for profile management.

use clap::Subcommand;
use std::path::PathBuf;

use crate::backup::BackupEngine;
use crate::display::{format_profile_details, format_profile_list};
use crate::error::BackvaultResult;
use crate::models::ProfileDraft;
use crate::services::ProfileRegistry;
use crate::storage::Storage;

/// Profile subcommands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Create a new profile
    Add {
        /// Profile name
        name: String,
        /// Directory to back up
        source: PathBuf,
        /// Directory snapshots are stored in
        backup: PathBuf,
    },

    /// Change a profile's name or directories
    Edit {
        /// Profile name or ID
        profile: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New source directory
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// New backup directory
        #[arg(short, long)]
        backup: Option<PathBuf>,
    },

    /// Delete a profile and all of its snapshots
    Delete {
        /// Profile name or ID
        profile: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// List all profiles
    List,

    /// Show a profile's details
    Show {
        /// Profile name or ID
        profile: String,
    },
}

/// Handle a profile command
pub fn handle_profile_command(storage: &Storage, cmd: ProfileCommands) -> BackvaultResult<()> {
    let registry = ProfileRegistry::new(storage);

    match cmd {
        ProfileCommands::Add {
            name,
            source,
            backup,
        } => {
            let profile = registry.add(&ProfileDraft::new(name, source, backup))?;
            println!("Created profile: {}", profile.name);
            println!("  ID:     {}", profile.id);
            println!("  Source: {}", profile.source_path.display());
            println!("  Backup: {}", profile.backup_path.display());
        }

        ProfileCommands::Edit {
            profile,
            name,
            source,
            backup,
        } => {
            let existing = registry.require(&profile)?;
            let mut draft = ProfileDraft::from_profile(&existing);
            if let Some(name) = name {
                draft.name = name.trim().to_string();
            }
            if let Some(source) = source {
                draft.source_path = source;
            }
            if let Some(backup) = backup {
                draft.backup_path = backup;
            }

            let updated = registry.edit(existing.id, &draft)?;
            println!("Updated profile: {}", updated.name);
            if updated.backup_path != existing.backup_path {
                println!(
                    "Note: existing snapshots remain in {}",
                    existing.backup_path.display()
                );
            }
        }

        ProfileCommands::Delete { profile, force } => {
            let existing = registry.require(&profile)?;
            let count = BackupEngine::new(storage).list(&existing)?.len();

            if storage.settings().confirm_destructive && !force {
                println!(
                    "WARNING: This deletes profile '{}' and its {} snapshot(s) in {}",
                    existing.name,
                    count,
                    existing.backup_path.display()
                );
                println!("To proceed, run again with --force flag:");
                println!("  backvault profile delete {} --force", profile);
                return Ok(());
            }

            let report = registry.delete(existing.id)?;
            println!("Deleted profile: {} ({})", existing.name, report.summary());
            for failure in &report.failures {
                println!("  Could not remove {}: {}", failure.folder_name, failure.reason);
            }
        }

        ProfileCommands::List => {
            let profiles = registry.list()?;
            println!("{}", format_profile_list(&profiles));
        }

        ProfileCommands::Show { profile } => {
            let profile = registry.require(&profile)?;
            let count = BackupEngine::new(storage).list(&profile)?.len();
            print!("{}", format_profile_details(&profile, count));
        }
    }

    Ok(())
}
