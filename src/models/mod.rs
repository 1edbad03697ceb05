//! Core data models for backvault
//!
//! Profiles bind a source directory to a backup directory; snapshots are
//! point-in-time copies stored under the backup directory.

pub mod ids;
pub mod profile;
pub mod snapshot;

pub use ids::{ProfileId, SnapshotId};
pub use profile::{Profile, ProfileDraft};
pub use snapshot::{Snapshot, SnapshotMetadata};
