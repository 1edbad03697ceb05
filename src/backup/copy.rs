//! Recursive directory copy and clear
//!
//! Shared by snapshot creation and restore. The destination tree is created
//! first, then every file is copied byte for byte. Symbolic links are
//! followed and copied as their target content. Permission bits are not
//! carried over.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use walkdir::WalkDir;

use crate::error::{BackvaultError, BackvaultResult};

/// Knobs for `copy_tree`
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyOptions<'a> {
    /// Top-level entry of the source that is not copied
    pub skip_root_entry: Option<&'a str>,
    /// Checked between files; a set flag aborts the copy and is cleared
    pub cancel: Option<&'a AtomicBool>,
}

/// What a copy did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub directories: usize,
    pub files: usize,
    pub bytes: u64,
}

/// Copy the contents of `from` into the existing directory `to`
pub fn copy_tree(from: &Path, to: &Path, options: CopyOptions<'_>) -> BackvaultResult<CopyStats> {
    let mut directories: Vec<PathBuf> = Vec::new();
    let mut files: Vec<PathBuf> = Vec::new();

    let walker = WalkDir::new(from)
        .follow_links(true)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() == 1
                && options
                    .skip_root_entry
                    .is_some_and(|skip| entry.file_name() == skip))
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            BackvaultError::CopyFailed(format!("Failed to read {}: {}", from.display(), e))
        })?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| BackvaultError::CopyFailed(e.to_string()))?
            .to_path_buf();

        if entry.file_type().is_dir() {
            directories.push(relative);
        } else {
            files.push(relative);
        }
    }

    let mut stats = CopyStats::default();

    for dir in &directories {
        let target = to.join(dir);
        fs::create_dir_all(&target).map_err(|e| {
            BackvaultError::CopyFailed(format!("Failed to create {}: {}", target.display(), e))
        })?;
        stats.directories += 1;
    }

    for file in &files {
        if let Some(cancel) = options.cancel {
            if cancel.swap(false, Ordering::SeqCst) {
                return Err(BackvaultError::CopyFailed("cancelled".into()));
            }
        }

        let source = from.join(file);
        let target = to.join(file);
        let bytes = fs::copy(&source, &target).map_err(|e| {
            BackvaultError::CopyFailed(format!("Failed to copy {}: {}", source.display(), e))
        })?;
        stats.files += 1;
        stats.bytes += bytes;
    }

    Ok(stats)
}

/// Remove everything inside `dir`, deepest entries first; `dir` itself stays
///
/// Links are removed, never followed. Returns the number of entries removed.
pub fn clear_directory(dir: &Path) -> BackvaultResult<usize> {
    let mut removed = 0;

    for entry in WalkDir::new(dir).min_depth(1).contents_first(true) {
        let entry = entry.map_err(|e| {
            BackvaultError::Io(format!("Failed to read {}: {}", dir.display(), e))
        })?;
        let path = entry.path();

        let result = if entry.file_type().is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path).or_else(|e| {
                // Directory links on Windows are removed like directories
                if entry.path_is_symlink() {
                    fs::remove_dir(path)
                } else {
                    Err(e)
                }
            })
        };
        result.map_err(|e| {
            BackvaultError::Io(format!("Failed to remove {}: {}", path.display(), e))
        })?;
        removed += 1;
    }

    Ok(removed)
}
