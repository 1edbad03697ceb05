//! Snapshot lifecycle for backvault
//!
//! # Architecture
//!
//! - `BackupEngine`: create, rename, restore and delete snapshots of a
//!   profile, including the best-effort cascade used when a profile goes away
//! - `copy`: the recursive copy and clear shared by create and restore
//! - `naming`: snapshot name validation and ` (n)` collision suffixes
//! - `ProfileLocks`: one mutex per profile, held for each whole operation
//!
//! # Snapshot Layout
//!
//! Each snapshot is a folder directly under the profile's backup directory,
//! named `YYYY-MM-DD_HHMMSS` at creation. With the scan backend a renamed
//! snapshot's folder carries the new name, and a `.backvault-meta.json`
//! side-file inside it remembers the display name and creation time.
//!
//! # Example
//!
//! ```rust,ignore
//! use backvault::backup::BackupEngine;
//!
//! let engine = BackupEngine::new(&storage);
//! let snapshot = engine.create_snapshot(&profile)?;
//! let snapshot = engine.rename(&profile, &snapshot, "Before upgrade")?;
//!
//! // Later, put the source back the way it was
//! let report = engine.restore(&profile, &snapshot)?;
//! println!("{}", report.summary());
//! ```

pub mod copy;
mod engine;
mod locks;
pub mod naming;
mod report;

pub use copy::{CopyOptions, CopyStats};
pub use engine::BackupEngine;
pub use locks::ProfileLocks;
pub use report::{CascadeFailure, CascadeReport, RestoreReport};
