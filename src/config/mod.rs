//! Configuration module for backvault
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BackvaultPaths;
pub use settings::{Settings, SnapshotBackend};
