use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use backvault::cli::{handle_backup_command, handle_log_command, handle_profile_command};
use backvault::config::{BackvaultPaths, Settings, SnapshotBackend};
use backvault::storage::Storage;

#[derive(Parser)]
#[command(
    name = "backvault",
    author = "Kaylee Beyene",
    version,
    about = "Profile-based point-in-time folder backups",
    long_about = "backvault keeps full-copy snapshots of folders. A profile binds a \
                  source directory to a backup directory; each snapshot is a plain \
                  folder you can browse, rename, restore from or delete."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile management commands
    #[command(subcommand)]
    Profile(backvault::cli::ProfileCommands),

    /// Snapshot commands
    #[command(subcommand, alias = "snapshot")]
    Backup(backvault::cli::BackupCommands),

    /// Show recent activity
    Log(backvault::cli::LogArgs),

    /// Show or change configuration
    Config {
        /// Snapshot backend to use from now on (indexed or scan)
        #[arg(long)]
        backend: Option<String>,

        /// Whether restore and profile delete need --force
        #[arg(long)]
        confirm_destructive: Option<bool>,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("backvault=warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = BackvaultPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Config {
            backend,
            confirm_destructive,
        }) => {
            let changed = backend.is_some() || confirm_destructive.is_some();
            if let Some(backend) = backend {
                settings.snapshot_backend = SnapshotBackend::parse(&backend).ok_or_else(|| {
                    anyhow::anyhow!("Unknown backend '{}' (expected indexed or scan)", backend)
                })?;
            }
            if let Some(confirm) = confirm_destructive {
                settings.confirm_destructive = confirm;
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("backvault Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Activity log:     {}", paths.activity_log().display());
            println!();
            println!("Settings:");
            println!("  Snapshot backend:     {}", settings.snapshot_backend);
            println!("  Confirm destructive:  {}", settings.confirm_destructive);
        }
        Some(command) => {
            // Initialize storage
            let storage = Storage::open(paths, settings)?;

            match command {
                Commands::Profile(cmd) => handle_profile_command(&storage, cmd)?,
                Commands::Backup(cmd) => handle_backup_command(&storage, cmd)?,
                Commands::Log(args) => handle_log_command(&storage, args)?,
                Commands::Config { .. } => {}
            }
        }
        None => {
            println!("backvault - point-in-time folder backups");
            println!();
            println!("Run 'backvault --help' for usage information.");
            println!("Run 'backvault profile add <name> <source> <backup>' to get started.");
        }
    }

    Ok(())
}
