//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as preparing the reports directory, moving report files and
//! copying artifact directories.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如准备报告目录、移动报告文件和复制产物目录。

use anyhow::{Context, Result};
use fs_extra::dir::{self, CopyOptions};
use fs_extra::file;
use std::fs;
use std::path::Path;

/// Creates `path` and its parents if they don't exist yet.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if is_directory(path) {
        return Ok(());
    }
    fs::create_dir_all(path)
}

/// Moves a file, overwriting the destination. Works across devices.
///
/// # Arguments
/// * `from` - Existing file
/// * `to` - Destination path; its parent directory is created when missing
///
/// 移动文件并覆盖目标，支持跨设备。
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        ensure_dir(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let mut options = file::CopyOptions::new();
    options.overwrite = true;
    file::move_file(from, to, &options)
        .with_context(|| format!("Failed to move {} to {}", from.display(), to.display()))?;
    Ok(())
}

/// Copies the entire content of a source directory into a destination directory.
///
/// # Arguments
/// * `from` - Source directory path
/// * `to` - Destination directory path
///
/// # Returns
/// A `Result` indicating success or failure
pub fn copy_dir_all(from: &Path, to: &Path) -> Result<()> {
    ensure_dir(to).with_context(|| format!("Failed to create directory: {}", to.display()))?;
    let mut options = CopyOptions::new();
    options.overwrite = true;
    options.copy_inside = true;
    dir::copy(from, to, &options)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    Ok(())
}

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_file_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("nested/b.txt");
        fs::write(&from, "new").unwrap();
        fs::create_dir_all(to.parent().unwrap()).unwrap();
        fs::write(&to, "old").unwrap();

        move_file(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "new");
    }

    #[test]
    fn test_copy_dir_all_copies_under_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("reports");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("report.xml"), "<testsuites/>").unwrap();

        let dest = dir.path().join("artifacts/exec-1");
        copy_dir_all(&src, &dest).unwrap();

        assert!(dest.join("reports/report.xml").exists());
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x/y");
        ensure_dir(&path).unwrap();
        ensure_dir(&path).unwrap();
        assert!(is_directory(&path));
    }
}
