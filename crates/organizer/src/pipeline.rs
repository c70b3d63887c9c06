//! Per-album state machine and the tree driver.
//!
//! An album moves through `Scanning → (Flattening → Scanning)* →
//! RenamingFiles → RenamingDirectory → Artwork → Done`. Every Flattening
//! step either removes a directory or marks it retained, and retained
//! directories are never flattened again, so the loop always ends.

use album_tidy_core::naming::{album_dir_name, track_file_name};
use album_tidy_core::{
    AlbumTags, ArtworkHandler, Confirm, EntryKind, Error, Field, Result, RunConfig, TagReader,
    TrackMetadata,
};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::approve;
use crate::flatten::flatten_tree;
use crate::fs_ops::{list_entries, rename_no_clobber};
use crate::report::{AlbumReport, RunReport};

enum Stage {
    Scanning,
    Flattening(PathBuf),
    RenamingFiles(Vec<(PathBuf, EntryKind)>),
    RenamingDirectory,
    Artwork,
    Done,
}

/// Tags observed while walking one album
#[derive(Default)]
struct Observed {
    /// Artist/album of the last audio file where both were readable
    last: Option<AlbumTags>,
    distinct: BTreeSet<(String, String)>,
}

impl Observed {
    fn record(&mut self, tags: AlbumTags) {
        self.distinct.insert((tags.artist.clone(), tags.album.clone()));
        self.last = Some(tags);
    }
}

/// Normalizes album directories.
///
/// Collaborators are injected so the pipeline runs the same way against real
/// media (`lofty` tags, console prompts, Spotify artwork) and in tests.
pub struct AlbumPipeline<'a> {
    config: &'a RunConfig,
    reader: &'a dyn TagReader,
    confirm: &'a mut dyn Confirm,
    artwork: Option<&'a mut dyn ArtworkHandler>,
}

impl<'a> AlbumPipeline<'a> {
    pub fn new(config: &'a RunConfig, reader: &'a dyn TagReader, confirm: &'a mut dyn Confirm) -> Self {
        Self {
            config,
            reader,
            confirm,
            artwork: None,
        }
    }

    pub fn with_artwork(mut self, artwork: &'a mut dyn ArtworkHandler) -> Self {
        self.artwork = Some(artwork);
        self
    }

    /// Process every immediate subdirectory of the configured root.
    ///
    /// Albums are independent: an album that fails part-way is reported and
    /// the walk moves on to the next one.
    pub fn run(&mut self) -> Result<RunReport> {
        let root = self.config.root.clone();
        if !root.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Root directory does not exist: {}", root.display()),
            )));
        }

        let mut report = RunReport::default();
        for (path, kind) in list_entries(&root)? {
            if kind != EntryKind::Subdirectory {
                debug!(path = %path.display(), "skipping non-directory in root");
                continue;
            }
            report.albums.push(self.process_album(&path));
        }

        Ok(report)
    }

    /// Bring one album directory into canonical form
    pub fn process_album(&mut self, album_dir: &Path) -> AlbumReport {
        info!(path = %album_dir.display(), "processing album");

        let mut report = AlbumReport::new(album_dir.to_path_buf());
        let mut album_dir = album_dir.to_path_buf();
        let mut retained: HashSet<PathBuf> = HashSet::new();
        let mut observed = Observed::default();
        let mut stage = Stage::Scanning;

        loop {
            stage = match stage {
                Stage::Scanning => match list_entries(&album_dir) {
                    Ok(entries) => {
                        let pending = entries
                            .iter()
                            .find(|(path, kind)| {
                                *kind == EntryKind::Subdirectory && !retained.contains(path)
                            })
                            .map(|(path, _)| path.clone());
                        match pending {
                            Some(path) => Stage::Flattening(path),
                            None => Stage::RenamingFiles(entries),
                        }
                    }
                    Err(e) => {
                        warn!(path = %album_dir.display(), error = %e, "failed to list album");
                        report.errors.push(e);
                        Stage::Done
                    }
                },
                Stage::Flattening(subdir) => {
                    self.flatten(&album_dir, &subdir, &mut report);
                    if subdir.exists() {
                        retained.insert(subdir);
                    }
                    Stage::Scanning
                }
                Stage::RenamingFiles(entries) => {
                    for (path, kind) in entries {
                        self.process_entry(&path, kind, &mut observed, &mut report);
                    }
                    Stage::RenamingDirectory
                }
                Stage::RenamingDirectory => {
                    album_dir = self.rename_album_dir(album_dir, &observed, &mut report);
                    Stage::Artwork
                }
                Stage::Artwork => {
                    if let Some(artwork) = self.artwork.as_deref_mut() {
                        let status = artwork.ensure_cover(&album_dir, observed.last.as_ref());
                        if status.needs_attention() {
                            warn!(path = %album_dir.display(), "{}", status);
                        }
                        report.artwork = Some(status);
                    }
                    Stage::Done
                }
                Stage::Done => break,
            };
        }

        report.album_dir = album_dir;
        report
    }

    fn flatten(&mut self, album_dir: &Path, subdir: &Path, report: &mut AlbumReport) {
        debug!(path = %subdir.display(), "flattening");
        match flatten_tree(album_dir, subdir, self.config, &mut *self.confirm) {
            Ok(outcomes) => {
                for (dir, outcome) in outcomes {
                    report.moved_files.extend(outcome.moved);
                    if outcome.removed {
                        report.removed_dirs.push(dir);
                    } else if dir.exists() {
                        report
                            .warnings
                            .push(format!("Kept directory {}", dir.display()));
                    }
                }
            }
            Err(e) => {
                warn!(path = %subdir.display(), error = %e, "flatten failed");
                report.errors.push(e);
            }
        }
    }

    fn process_entry(
        &mut self,
        path: &Path,
        kind: EntryKind,
        observed: &mut Observed,
        report: &mut AlbumReport,
    ) {
        match kind {
            EntryKind::Audio(_) => {
                if let Err(e) = self.process_track(path, observed, report) {
                    warn!(path = %path.display(), error = %e, "track skipped");
                    report.errors.push(e);
                }
            }
            EntryKind::Cover => {
                debug!(path = %path.display(), "cover art left for artwork step");
            }
            EntryKind::Disallowed => self.dispose(path, report),
            // Only retained directories remain at this point
            EntryKind::Subdirectory => {}
        }
    }

    /// Normalize the track tag, then rename the file to its canonical name
    fn process_track(&mut self, path: &Path, observed: &mut Observed, report: &mut AlbumReport) -> Result<()> {
        let mut track = TrackMetadata::read(self.reader, path)?;
        debug!(?track, "read tags");

        if let Some(tags) = track.album_tags() {
            observed.record(tags);
        }

        let number = track.normalize_track_number()?;
        if number.rewritten {
            info!(path = %path.display(), track = number.value, "rewrote track number");
            report.tags_written += 1;
        }

        let name = track_file_name(
            track.disc.as_deref(),
            number.value,
            track.require(Field::Title)?,
            track.format.extension(),
        )?;

        if name != track.file_name {
            let destination = track.album_dir.join(&name);
            rename_no_clobber(path, &destination)?;
            info!(
                from = %track.file_name,
                to = %name,
                dir = %track.album_dir.display(),
                "renamed track"
            );
            report.renamed_files.push((track.file_name.clone(), name));
        }

        Ok(())
    }

    /// Delete a file that does not belong in an album, if allowed
    fn dispose(&mut self, path: &Path, report: &mut AlbumReport) {
        info!(path = %path.display(), "other file found");

        let prompt = format!("Delete {}?", path.display());
        if !approve(self.config, &mut *self.confirm, &prompt) {
            report.kept_files.push(path.to_path_buf());
            return;
        }

        match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "file removed");
                report.deleted_files.push(path.to_path_buf());
            }
            Err(e) => report.errors.push(e.into()),
        }
    }

    /// Rename the album directory from the last observed artist/album.
    ///
    /// Returns the directory's path after the step.
    fn rename_album_dir(&mut self, album_dir: PathBuf, observed: &Observed, report: &mut AlbumReport) -> PathBuf {
        if observed.distinct.len() > 1 {
            let seen: Vec<String> = observed
                .distinct
                .iter()
                .map(|(artist, album)| format!("'{} - {}'", artist, album))
                .collect();
            report.warnings.push(format!(
                "Tracks disagree on artist/album ({}); using the last one read",
                seen.join(", ")
            ));
        }

        let Some(tags) = &observed.last else {
            report
                .warnings
                .push("No track with readable artist and album; directory not renamed".to_string());
            return album_dir;
        };

        let name = album_dir_name(&tags.artist, &tags.album);
        let current = album_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name == current {
            return album_dir;
        }

        let Some(parent) = album_dir.parent() else {
            return album_dir;
        };
        let destination = parent.join(&name);

        match rename_no_clobber(&album_dir, &destination) {
            Ok(()) => {
                info!(from = %album_dir.display(), to = %destination.display(), "moved album");
                report.renamed_dir = Some((current, name));
                destination
            }
            Err(e) => {
                warn!(path = %album_dir.display(), error = %e, "album rename failed");
                report.errors.push(e);
                album_dir
            }
        }
    }
}
