use std::fmt;
use std::fs::FileType;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::naming;

/// Canonical cover art file name inside an album directory
pub const COVER_FILE_NAME: &str = "cover.jpg";

/// Alternate cover name that is accepted and renamed to [`COVER_FILE_NAME`]
pub const COVER_ALIAS: &str = "folder.jpg";

/// The five semantic tag fields the pipeline cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Artist,
    Album,
    Title,
    Track,
    Disc,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Artist => "artist",
            Field::Album => "album",
            Field::Title => "title",
            Field::Track => "track",
            Field::Disc => "disc",
        };
        f.write_str(name)
    }
}

/// Supported audio containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Flac,
}

impl AudioFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            _ => None,
        }
    }

    /// Extension including the leading dot, as used in canonical file names
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => ".mp3",
            AudioFormat::Flac => ".flac",
        }
    }
}

/// What the pipeline does with a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Subdirectory,
    Audio(AudioFormat),
    Cover,
    Disallowed,
}

impl EntryKind {
    pub fn classify(path: &Path, file_type: FileType) -> Self {
        if file_type.is_dir() {
            return EntryKind::Subdirectory;
        }
        if let Some(format) = AudioFormat::from_path(path) {
            return EntryKind::Audio(format);
        }
        if is_cover_name(path) {
            return EntryKind::Cover;
        }
        EntryKind::Disallowed
    }
}

/// True for `cover.jpg` or `folder.jpg` in any letter case
pub fn is_cover_name(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .is_some_and(|n| n.eq_ignore_ascii_case(COVER_FILE_NAME) || n.eq_ignore_ascii_case(COVER_ALIAS))
}

/// Format-specific tag access.
///
/// One implementation exists per supported container; each maps a [`Field`]
/// to the key that container uses natively. `set` only changes the in-memory
/// tag, `save` persists it to the file.
pub trait MetadataSource {
    fn get(&self, field: Field) -> Option<String>;
    fn set(&mut self, field: Field, value: &str);
    fn save(&mut self) -> Result<()>;
}

/// Opens a [`MetadataSource`] for a file of a known format
pub trait TagReader {
    fn open(&self, path: &Path, format: AudioFormat) -> Result<Box<dyn MetadataSource>>;
}

/// Decides whether a destructive action may proceed
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Artist/album pair used for the directory name and artwork lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumTags {
    pub artist: String,
    pub album: String,
}

/// Outcome of the cover art step for one album
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworkStatus {
    Valid,
    Missing,
    WrongSize { width: u32, height: u32 },
    Fetched,
    LookupMiss,
    Failed(String),
}

impl ArtworkStatus {
    /// Whether the album still needs manual attention
    pub fn needs_attention(&self) -> bool {
        !matches!(self, ArtworkStatus::Valid | ArtworkStatus::Fetched)
    }
}

impl fmt::Display for ArtworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtworkStatus::Valid => write!(f, "cover ok"),
            ArtworkStatus::Missing => write!(f, "no cover art"),
            ArtworkStatus::WrongSize { width, height } => {
                write!(f, "incorrect cover size {}x{}", width, height)
            }
            ArtworkStatus::Fetched => write!(f, "saved new artwork"),
            ArtworkStatus::LookupMiss => write!(f, "not found online, find artwork manually"),
            ArtworkStatus::Failed(msg) => write!(f, "artwork failed: {}", msg),
        }
    }
}

/// Ensures an album directory ends up with a valid cover image
pub trait ArtworkHandler {
    fn ensure_cover(&mut self, album_dir: &Path, tags: Option<&AlbumTags>) -> ArtworkStatus;
}

/// A cleaned track number and whether the file's tag had to be rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackNumber {
    pub value: u32,
    pub rewritten: bool,
}

/// Metadata of one audio file, alive for a single pipeline step
pub struct TrackMetadata {
    pub handle: Box<dyn MetadataSource>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub track: Option<String>,
    pub disc: Option<String>,
    pub format: AudioFormat,
    pub file_name: String,
    pub album_dir: PathBuf,
}

impl TrackMetadata {
    /// Read the five fields of `path` through `reader`
    pub fn read(reader: &dyn TagReader, path: &Path) -> Result<Self> {
        let format =
            AudioFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;
        let handle = reader.open(path, format)?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let album_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(TrackMetadata {
            artist: handle.get(Field::Artist),
            album: handle.get(Field::Album),
            title: handle.get(Field::Title),
            track: handle.get(Field::Track),
            disc: handle.get(Field::Disc),
            handle,
            format,
            file_name,
            album_dir,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.album_dir.join(&self.file_name)
    }

    /// Artist and album, if both are present
    pub fn album_tags(&self) -> Option<AlbumTags> {
        match (&self.artist, &self.album) {
            (Some(artist), Some(album)) => Some(AlbumTags {
                artist: artist.clone(),
                album: album.clone(),
            }),
            _ => None,
        }
    }

    /// Clean the raw track tag and persist the cleaned form into the file.
    ///
    /// The file is only saved when the stored value changes, so a second
    /// run over a normalized file never touches it.
    pub fn normalize_track_number(&mut self) -> Result<TrackNumber> {
        let raw = self.require(Field::Track)?;
        let (cleaned, value) = naming::clean_track_number(raw)?;
        let rewritten = cleaned != raw;

        if rewritten {
            self.handle.set(Field::Track, &cleaned);
            self.handle.save()?;
            self.track = Some(cleaned);
        }

        Ok(TrackNumber { value, rewritten })
    }

    /// A required field, or a [`Error::MissingTag`] naming this file
    pub fn require(&self, field: Field) -> Result<&str> {
        let value = match field {
            Field::Artist => &self.artist,
            Field::Album => &self.album,
            Field::Title => &self.title,
            Field::Track => &self.track,
            Field::Disc => &self.disc,
        };
        value.as_deref().ok_or_else(|| Error::MissingTag {
            field,
            path: self.path(),
        })
    }
}

impl fmt::Debug for TrackMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackMetadata")
            .field("artist", &self.artist)
            .field("album", &self.album)
            .field("title", &self.title)
            .field("track", &self.track)
            .field("disc", &self.disc)
            .field("format", &self.format)
            .field("file_name", &self.file_name)
            .field("album_dir", &self.album_dir)
            .finish()
    }
}
