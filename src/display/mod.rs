//! Display formatting for terminal output
//!
//! Provides utilities for formatting profiles, snapshots and activity for
//! terminal display.

pub mod activity;
pub mod profile;
pub mod snapshot;

pub use activity::format_log;
pub use profile::{format_profile_details, format_profile_list};
pub use snapshot::format_snapshot_list;
