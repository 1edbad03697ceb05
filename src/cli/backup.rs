//! Backup CLI commands
//!
//! Implements CLI commands for snapshot management.

use clap::Subcommand;

use crate::backup::BackupEngine;
use crate::display::format_snapshot_list;
use crate::error::{BackvaultError, BackvaultResult};
use crate::models::{Profile, Snapshot};
use crate::services::ProfileRegistry;
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Take a snapshot of a profile's source directory
    Create {
        /// Profile name or ID
        profile: String,
    },

    /// List a profile's snapshots, newest first
    List {
        /// Profile name or ID
        profile: String,
    },

    /// Rename a snapshot
    Rename {
        /// Profile name or ID
        profile: String,
        /// Snapshot folder or name (use 'latest' for most recent)
        snapshot: String,
        /// New name
        new_name: String,
    },

    /// Delete a snapshot
    Delete {
        /// Profile name or ID
        profile: String,
        /// Snapshot folder or name (use 'latest' for most recent)
        snapshot: String,
    },

    /// Replace the source directory with a snapshot's contents
    Restore {
        /// Profile name or ID
        profile: String,
        /// Snapshot folder or name (use 'latest' for most recent)
        snapshot: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Print the backup directory, or one snapshot's folder
    Path {
        /// Profile name or ID
        profile: String,
        /// Snapshot folder or name
        snapshot: Option<String>,
    },
}

/// Handle a backup command
pub fn handle_backup_command(storage: &Storage, cmd: BackupCommands) -> BackvaultResult<()> {
    let registry = ProfileRegistry::new(storage);
    let engine = BackupEngine::new(storage);

    match cmd {
        BackupCommands::Create { profile } => {
            let profile = registry.require(&profile)?;
            println!("Creating snapshot of {}...", profile.source_path.display());
            let snapshot = engine.create_snapshot(&profile)?;
            println!("Snapshot created: {}", snapshot.display_name);
            println!(
                "Location: {}",
                engine.snapshot_dir(&profile, &snapshot).display()
            );
        }

        BackupCommands::List { profile } => {
            let profile = registry.require(&profile)?;
            let snapshots = engine.list(&profile)?;
            println!("Snapshots of {}", profile.name);
            println!();
            println!("{}", format_snapshot_list(&snapshots));
        }

        BackupCommands::Rename {
            profile,
            snapshot,
            new_name,
        } => {
            let profile = registry.require(&profile)?;
            let snapshot = resolve_snapshot(&engine, &profile, &snapshot)?;
            let renamed = engine.rename(&profile, &snapshot, &new_name)?;
            println!("Renamed '{}' to '{}'", snapshot.display_name, renamed.display_name);
            if renamed.folder_name != snapshot.folder_name {
                println!("Folder: {}", renamed.folder_name);
            }
        }

        BackupCommands::Delete { profile, snapshot } => {
            let profile = registry.require(&profile)?;
            let snapshot = resolve_snapshot(&engine, &profile, &snapshot)?;
            if engine.delete_snapshot(&profile, &snapshot)? {
                println!("Deleted snapshot: {}", snapshot.display_name);
            } else {
                println!("Snapshot {} was already deleted", snapshot.display_name);
            }
        }

        BackupCommands::Restore {
            profile,
            snapshot,
            force,
        } => {
            let profile_arg = profile;
            let profile = registry.require(&profile_arg)?;
            let snapshot_arg = snapshot;
            let snapshot = resolve_snapshot(&engine, &profile, &snapshot_arg)?;

            if storage.settings().confirm_destructive && !force {
                println!("Snapshot: {} ({})", snapshot.display_name, snapshot.folder_name);
                println!("Target:   {}", profile.source_path.display());
                println!();
                println!("WARNING: This deletes EVERYTHING in the target directory first!");
                println!("To proceed, run again with --force flag:");
                println!(
                    "  backvault backup restore {} {} --force",
                    profile_arg, snapshot_arg
                );
                return Ok(());
            }

            println!("Restoring snapshot...");
            match engine.restore(&profile, &snapshot) {
                Ok(report) => {
                    println!("Restore complete!");
                    println!("{}", report.summary());
                }
                Err(e) if e.is_partial_restore() => {
                    eprintln!("The source directory was cleared but not fully restored.");
                    eprintln!(
                        "Copy the files from {} back by hand.",
                        engine.snapshot_dir(&profile, &snapshot).display()
                    );
                    return Err(e);
                }
                Err(e) => return Err(e),
            }
        }

        BackupCommands::Path { profile, snapshot } => {
            let profile = registry.require(&profile)?;
            match snapshot {
                Some(snapshot) => {
                    let snapshot = resolve_snapshot(&engine, &profile, &snapshot)?;
                    println!("{}", engine.snapshot_dir(&profile, &snapshot).display());
                }
                None => println!("{}", profile.backup_path.display()),
            }
        }
    }

    Ok(())
}

/// Resolve a snapshot identifier, with 'latest' meaning the newest snapshot
fn resolve_snapshot(
    engine: &BackupEngine<'_>,
    profile: &Profile,
    identifier: &str,
) -> BackvaultResult<Snapshot> {
    if identifier.eq_ignore_ascii_case("latest") {
        return engine
            .list(profile)?
            .into_iter()
            .next()
            .ok_or_else(|| BackvaultError::snapshot_not_found("latest"));
    }
    engine.require(profile, identifier)
}
