use album_tidy_core::{ArtworkStatus, Error};
use std::path::PathBuf;

/// What happened to one album directory
#[derive(Debug, Default)]
pub struct AlbumReport {
    /// Album directory after processing (renamed path if the rename succeeded)
    pub album_dir: PathBuf,
    /// Directory name change, `(old, new)`
    pub renamed_dir: Option<(String, String)>,
    /// Track renames, `(old, new)`
    pub renamed_files: Vec<(String, String)>,
    /// Files whose track-number tag was rewritten
    pub tags_written: usize,
    /// Files moved up out of nested directories
    pub moved_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    pub deleted_files: Vec<PathBuf>,
    /// Disallowed files the operator chose to keep
    pub kept_files: Vec<PathBuf>,
    pub errors: Vec<Error>,
    pub warnings: Vec<String>,
    pub artwork: Option<ArtworkStatus>,
}

impl AlbumReport {
    pub fn new(album_dir: PathBuf) -> Self {
        Self {
            album_dir,
            ..Default::default()
        }
    }

    /// Number of filesystem or tag changes made
    pub fn changes(&self) -> usize {
        self.renamed_dir.iter().count()
            + self.renamed_files.len()
            + self.tags_written
            + self.moved_files.len()
            + self.removed_dirs.len()
            + self.deleted_files.len()
            + usize::from(matches!(self.artwork, Some(ArtworkStatus::Fetched)))
    }

    /// Anything the operator should look at by hand
    pub fn needs_attention(&self) -> bool {
        !self.errors.is_empty()
            || !self.warnings.is_empty()
            || self.artwork.as_ref().is_some_and(ArtworkStatus::needs_attention)
    }
}

/// Outcome of a whole run
#[derive(Debug, Default)]
pub struct RunReport {
    pub albums: Vec<AlbumReport>,
}

impl RunReport {
    pub fn changes(&self) -> usize {
        self.albums.iter().map(AlbumReport::changes).sum()
    }

    pub fn error_count(&self) -> usize {
        self.albums.iter().map(|a| a.errors.len()).sum()
    }

    pub fn needing_attention(&self) -> impl Iterator<Item = &AlbumReport> {
        self.albums.iter().filter(|a| a.needs_attention())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_clean() {
        let report = AlbumReport::new(PathBuf::from("/music/A - B"));
        assert_eq!(report.changes(), 0);
        assert!(!report.needs_attention());
    }

    #[test]
    fn test_changes_counted() {
        let mut report = AlbumReport::new(PathBuf::from("/music/A - B"));
        report.renamed_dir = Some(("a".to_string(), "A - B".to_string()));
        report.renamed_files.push(("x.mp3".to_string(), "01. X.mp3".to_string()));
        report.tags_written = 2;
        report.artwork = Some(ArtworkStatus::Fetched);
        assert_eq!(report.changes(), 5);
        assert!(!report.needs_attention());
    }

    #[test]
    fn test_attention_from_artwork_and_errors() {
        let mut report = AlbumReport::new(PathBuf::from("/music/A - B"));
        report.artwork = Some(ArtworkStatus::Missing);
        assert!(report.needs_attention());

        let mut report = AlbumReport::new(PathBuf::from("/music/A - B"));
        report.errors.push(Error::MalformedTrackNumber("x".to_string()));
        assert!(report.needs_attention());

        let run = RunReport {
            albums: vec![report, AlbumReport::new(PathBuf::from("/music/C - D"))],
        };
        assert_eq!(run.error_count(), 1);
        assert_eq!(run.needing_attention().count(), 1);
    }
}
