use album_tidy_core::{Confirm, Result, RunConfig};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::approve;
use crate::fs_ops::rename_no_clobber;

/// Result of flattening one directory
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FlattenOutcome {
    /// New locations of the moved files
    pub moved: Vec<PathBuf>,
    /// Whether the emptied directory was removed
    pub removed: bool,
}

/// Move every regular file of `subdir` into `parent`.
///
/// Only files directly inside `subdir` are moved; nested directories stay
/// where they are. If `subdir` ends up empty it is removed, subject to the
/// run's delete authorization or `confirm`. A file name that already exists
/// in `parent` stops the flatten with [`album_tidy_core::Error::RenameCollision`].
pub fn flatten_dir(
    parent: &Path,
    subdir: &Path,
    config: &RunConfig,
    confirm: &mut dyn Confirm,
) -> Result<FlattenOutcome> {
    let mut outcome = FlattenOutcome::default();

    let mut files = Vec::new();
    for entry in WalkDir::new(subdir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    for source in files {
        let Some(name) = source.file_name() else {
            continue;
        };
        let destination = parent.join(name);
        rename_no_clobber(&source, &destination)?;
        debug!(from = %source.display(), to = %destination.display(), "moved file up");
        outcome.moved.push(destination);
    }

    let is_empty = fs::read_dir(subdir)?.next().is_none();
    if is_empty
        && approve(
            config,
            confirm,
            &format!("Remove empty directory at {}?", subdir.display()),
        )
    {
        fs::remove_dir(subdir)?;
        info!(path = %subdir.display(), "removed empty directory");
        outcome.removed = true;
    }

    Ok(outcome)
}

/// Flatten `subdir` and everything below it into `album_dir`.
///
/// Directories are visited deepest first, so each level is merged into its
/// parent before that parent is merged upward. Returns the per-directory
/// outcomes in the order they were applied.
pub fn flatten_tree(
    album_dir: &Path,
    subdir: &Path,
    config: &RunConfig,
    confirm: &mut dyn Confirm,
) -> Result<Vec<(PathBuf, FlattenOutcome)>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(subdir).contents_first(true).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }

    let mut outcomes = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let parent = match dir.parent() {
            Some(p) if dir != subdir => p.to_path_buf(),
            _ => album_dir.to_path_buf(),
        };
        let outcome = flatten_dir(&parent, &dir, config, confirm)?;
        outcomes.push((dir, outcome));
    }

    Ok(outcomes)
}
