use album_tidy_core::{
    AlbumTags, ArtworkHandler, ArtworkStatus, COVER_FILE_NAME, Error, Result, is_cover_name,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::process::{TARGET_SIZE, square_cover};

/// Where replacement artwork comes from
pub trait CoverSource {
    /// Raw image bytes for the album, or [`Error::ArtworkLookupMiss`]
    fn fetch(&mut self, tags: &AlbumTags) -> Result<Vec<u8>>;
}

/// Checks each album's cover and, with a source attached, replaces it.
pub struct CoverArt {
    source: Option<Box<dyn CoverSource>>,
}

impl CoverArt {
    /// Report invalid covers without touching the network
    pub fn check_only() -> Self {
        Self { source: None }
    }

    pub fn fetching(source: Box<dyn CoverSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Status of the canonical cover file, if present
    fn inspect(cover: &Path) -> ArtworkStatus {
        if !cover.is_file() {
            return ArtworkStatus::Missing;
        }
        match image::image_dimensions(cover) {
            Ok((TARGET_SIZE, TARGET_SIZE)) => ArtworkStatus::Valid,
            Ok((width, height)) => ArtworkStatus::WrongSize { width, height },
            Err(e) => ArtworkStatus::Failed(format!("unreadable cover: {}", e)),
        }
    }

    fn replace(&mut self, cover: &Path, tags: Option<&AlbumTags>) -> ArtworkStatus {
        let Some(source) = self.source.as_mut() else {
            return Self::inspect(cover);
        };
        let Some(tags) = tags else {
            return ArtworkStatus::Failed("no artist/album tags to search with".to_string());
        };

        let result = source
            .fetch(tags)
            .and_then(|data| square_cover(&data))
            .and_then(|jpeg| fs::write(cover, jpeg).map_err(Error::from));

        match result {
            Ok(()) => {
                info!(path = %cover.display(), "saved new artwork");
                ArtworkStatus::Fetched
            }
            Err(Error::ArtworkLookupMiss { artist, album }) => {
                warn!("{} - {} could not be found, find artwork manually", artist, album);
                ArtworkStatus::LookupMiss
            }
            Err(e) => {
                warn!(path = %cover.display(), error = %e, "artwork fetch failed");
                ArtworkStatus::Failed(e.to_string())
            }
        }
    }
}

/// Rename an alias or differently-cased cover to the canonical name.
///
/// Returns the canonical path whether or not a cover exists.
fn canonicalize_cover(album_dir: &Path) -> Result<PathBuf> {
    let canonical = album_dir.join(COVER_FILE_NAME);

    let mut candidates = Vec::new();
    for entry in fs::read_dir(album_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && is_cover_name(&entry.path()) {
            candidates.push(entry.file_name());
        }
    }

    if candidates.iter().any(|name| name == COVER_FILE_NAME) {
        return Ok(canonical);
    }

    candidates.sort();
    // Prefer a cover.jpg spelling over the folder.jpg alias
    let chosen = candidates
        .iter()
        .find(|name| name.to_string_lossy().eq_ignore_ascii_case(COVER_FILE_NAME))
        .or_else(|| candidates.first());

    if let Some(name) = chosen {
        let from = album_dir.join(name);
        fs::rename(&from, &canonical)?;
        info!(from = %from.display(), to = %canonical.display(), "renamed cover");
    }

    Ok(canonical)
}

impl ArtworkHandler for CoverArt {
    fn ensure_cover(&mut self, album_dir: &Path, tags: Option<&AlbumTags>) -> ArtworkStatus {
        let cover = match canonicalize_cover(album_dir) {
            Ok(cover) => cover,
            Err(e) => return ArtworkStatus::Failed(e.to_string()),
        };

        match Self::inspect(&cover) {
            ArtworkStatus::Valid => ArtworkStatus::Valid,
            status => {
                warn!(path = %album_dir.display(), "{}", status);
                if self.source.is_some() {
                    self.replace(&cover, tags)
                } else {
                    status
                }
            }
        }
    }
}
