use album_tidy_core::{EntryKind, Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Direct children of `dir`, classified, sorted by file name
pub fn list_entries(dir: &Path) -> Result<Vec<(PathBuf, EntryKind)>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::from)?;
        let kind = EntryKind::classify(entry.path(), entry.file_type());
        entries.push((entry.into_path(), kind));
    }

    Ok(entries)
}

/// True if `dir` contains an entry named exactly `name`.
///
/// Unlike `Path::exists` this is case-exact, so a case-only rename on a
/// case-insensitive filesystem is not mistaken for a collision.
fn has_entry_named(dir: &Path, name: &std::ffi::OsStr) -> Result<bool> {
    for entry in fs::read_dir(dir)? {
        if entry?.file_name() == name {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Rename `from` to `to`, failing with [`Error::RenameCollision`] instead of
/// replacing an existing file or directory.
pub fn rename_no_clobber(from: &Path, to: &Path) -> Result<()> {
    let collision = || Error::RenameCollision {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
    };

    let (Some(parent), Some(name)) = (to.parent(), to.file_name()) else {
        return Err(collision());
    };

    if to.symlink_metadata().is_ok() {
        let case_only = from.parent() == Some(parent)
            && from
                .file_name()
                .is_some_and(|n| n.to_string_lossy().to_lowercase() == name.to_string_lossy().to_lowercase());
        if !case_only || has_entry_named(parent, name)? {
            return Err(collision());
        }
    }

    fs::rename(from, to)?;
    Ok(())
}
