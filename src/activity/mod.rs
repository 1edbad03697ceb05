//! Activity log for backvault
//!
//! Every mutating engine or registry operation records what it did, or why
//! it failed, here.
//!
//! # Architecture
//!
//! - `LogEntry`: timestamp, message and an optional weak reference to the
//!   profile the event concerns.
//! - `ActivityLog`: in-memory session list mirrored to an append-only text
//!   file, one `<timestamp> [<profile>] <message>` line per event.
//!
//! # Example
//!
//! ```rust,ignore
//! use backvault::activity::ActivityLog;
//!
//! let log = ActivityLog::open(paths.activity_log());
//! log.record("Created snapshot 2025-01-02 10:11:12", Some(&profile));
//!
//! for entry in log.query(&profile) {
//!     println!("{}", entry);
//! }
//! ```

mod entry;
mod logger;

pub use entry::{LogEntry, LINE_TIME_FORMAT};
pub use logger::ActivityLog;
