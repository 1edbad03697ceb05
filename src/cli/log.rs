//! Activity log CLI command

use clap::Args;

use crate::display::format_log;
use crate::error::BackvaultResult;
use crate::services::ProfileRegistry;
use crate::storage::Storage;

/// Arguments for `backvault log`
#[derive(Args)]
pub struct LogArgs {
    /// Only show entries for this profile (name or ID)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Number of entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Handle the log command
pub fn handle_log_command(storage: &Storage, args: LogArgs) -> BackvaultResult<()> {
    let entries = match args.profile {
        Some(profile) => {
            let profile = ProfileRegistry::new(storage).require(&profile)?;
            storage.activity.query(&profile)
        }
        None => storage.activity.entries(),
    };

    println!("{}", format_log(&entries, Some(args.limit)));
    Ok(())
}
