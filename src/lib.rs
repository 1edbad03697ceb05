//! backvault - Profile-based point-in-time folder backups
//!
//! This library provides the core of backvault: named profiles that bind a
//! source directory to a backup directory, and a backup engine that takes
//! full-copy snapshots, renames them without collisions, restores them over
//! the source and deletes them.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (profiles, snapshots, IDs)
//! - `storage`: JSON file storage and the pluggable snapshot stores
//! - `services`: Profile validation and the profile registry
//! - `backup`: The snapshot lifecycle engine
//! - `activity`: Append-only activity log
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `backvault` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use backvault::backup::BackupEngine;
//! use backvault::config::{BackvaultPaths, Settings};
//! use backvault::models::ProfileDraft;
//! use backvault::services::ProfileRegistry;
//! use backvault::storage::Storage;
//!
//! let paths = BackvaultPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths, settings)?;
//!
//! let profile = ProfileRegistry::new(&storage)
//!     .add(&ProfileDraft::new("Docs", "/home/me/docs", "/mnt/backups/docs"))?;
//! let snapshot = BackupEngine::new(&storage).create_snapshot(&profile)?;
//! ```

pub mod activity;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BackvaultError, BackvaultResult, ValidationError};
