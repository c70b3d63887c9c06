//! Tag access for the supported audio containers, backed by `lofty`.
//!
//! MP3 files are read through their ID3v2 tag (`TPE1`, `TALB`, `TIT2`,
//! `TRCK`, `TPOS`) and FLAC files through their Vorbis comments
//! (`ALBUMARTIST`, `ALBUM`, `TITLE`, `TRACKNUMBER`, `DISCNUMBER`). Each
//! container gets its own [`FormatProfile`]; the rest of the code only sees
//! [`MetadataSource`].
//!
//! lofty parses a Vorbis `TRACKNUMBER` into an integer while reading, so
//! `05`, `5/12` and `05/12` all come back as `5` (with `12` moved into a
//! separate track total). The stored text would then never look dirty and
//! would never be rewritten. FLAC track numbers are therefore read verbatim
//! with `metaflac`; writing still goes through lofty, which stores the
//! cleaned `TRACKNUMBER` and keeps any total as `TRACKTOTAL`.

use album_tidy_core::{AudioFormat, Error, Field, MetadataSource, Result, TagReader};
use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{Tag, TagType};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Native keys of one tag container
#[derive(Debug)]
pub struct FormatProfile {
    pub tag_type: TagType,
    pub artist: ItemKey,
    pub album: ItemKey,
    pub title: ItemKey,
    pub track: ItemKey,
    /// Set when the container stores `N/total` in one frame that lofty splits
    pub track_total: Option<ItemKey>,
    pub disc: ItemKey,
    pub disc_total: Option<ItemKey>,
    /// Comment holding the track number as stored, read around lofty
    pub raw_track: Option<&'static str>,
}

/// ID3v2: `TRCK` and `TPOS` hold `N/total`, lofty splits them into two items
pub static ID3V2_PROFILE: FormatProfile = FormatProfile {
    tag_type: TagType::Id3v2,
    artist: ItemKey::TrackArtist,
    album: ItemKey::AlbumTitle,
    title: ItemKey::TrackTitle,
    track: ItemKey::TrackNumber,
    track_total: Some(ItemKey::TrackTotal),
    disc: ItemKey::DiscNumber,
    disc_total: Some(ItemKey::DiscTotal),
    raw_track: None,
};

/// Vorbis comments: `TRACKNUMBER` comes from the raw comment. A separate
/// `DISCTOTAL` is still read so multi-disc albums are recognized.
pub static VORBIS_PROFILE: FormatProfile = FormatProfile {
    tag_type: TagType::VorbisComments,
    artist: ItemKey::AlbumArtist,
    album: ItemKey::AlbumTitle,
    title: ItemKey::TrackTitle,
    track: ItemKey::TrackNumber,
    track_total: None,
    disc: ItemKey::DiscNumber,
    disc_total: Some(ItemKey::DiscTotal),
    raw_track: Some("TRACKNUMBER"),
};

impl FormatProfile {
    pub fn for_format(format: AudioFormat) -> &'static FormatProfile {
        match format {
            AudioFormat::Mp3 => &ID3V2_PROFILE,
            AudioFormat::Flac => &VORBIS_PROFILE,
        }
    }
}

/// Opens files with `lofty`
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn open(&self, path: &Path, format: AudioFormat) -> Result<Box<dyn MetadataSource>> {
        Ok(Box::new(LoftySource::open(path, format)?))
    }
}

/// One file's tag of the container matching its format
pub struct LoftySource {
    path: PathBuf,
    profile: &'static FormatProfile,
    tag: Tag,
    /// Track number exactly as stored, for profiles with `raw_track`
    raw_track: Option<String>,
}

impl LoftySource {
    pub fn open(path: &Path, format: AudioFormat) -> Result<Self> {
        let profile = FormatProfile::for_format(format);

        let tagged_file = Probe::open(path)
            .map_err(|e| tag_error(path, format!("Failed to open: {}", e)))?
            .read()
            .map_err(|e| tag_error(path, format!("Failed to read: {}", e)))?;

        let tag = match tagged_file.tag(profile.tag_type) {
            Some(tag) => tag.clone(),
            None => {
                debug!(path = %path.display(), tag_type = ?profile.tag_type, "no tag present");
                Tag::new(profile.tag_type)
            }
        };

        let raw_track = match profile.raw_track {
            Some(key) => read_raw_comment(path, key)?,
            None => None,
        };

        Ok(Self::from_tag(path, profile, tag, raw_track))
    }

    fn from_tag(
        path: &Path,
        profile: &'static FormatProfile,
        tag: Tag,
        raw_track: Option<String>,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            profile,
            tag,
            raw_track,
        }
    }

    fn text(&self, key: &ItemKey) -> Option<String> {
        self.tag
            .get_string(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Rebuild `N/total` when the container's total lives in its own item
    fn number_with_total(&self, number: &ItemKey, total: Option<&ItemKey>) -> Option<String> {
        let number = self.text(number)?;
        match total.and_then(|key| self.text(key)) {
            Some(total) if !number.contains('/') => Some(format!("{}/{}", number, total)),
            _ => Some(number),
        }
    }
}

impl MetadataSource for LoftySource {
    fn get(&self, field: Field) -> Option<String> {
        let p = self.profile;
        match field {
            Field::Artist => self.text(&p.artist),
            Field::Album => self.text(&p.album),
            Field::Title => self.text(&p.title),
            Field::Track if p.raw_track.is_some() => self
                .raw_track
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            Field::Track => self.number_with_total(&p.track, p.track_total.as_ref()),
            Field::Disc => self.number_with_total(&p.disc, p.disc_total.as_ref()),
        }
    }

    /// Track and disc values replace the whole stored number, including any
    /// split-out total.
    fn set(&mut self, field: Field, value: &str) {
        let p = self.profile;
        let (key, total) = match field {
            Field::Artist => (&p.artist, None),
            Field::Album => (&p.album, None),
            Field::Title => (&p.title, None),
            Field::Track => (&p.track, p.track_total.as_ref()),
            Field::Disc => (&p.disc, p.disc_total.as_ref()),
        };
        self.tag.insert_text(key.clone(), value.to_string());
        if let Some(total) = total {
            self.tag.remove_key(total);
        }
        if field == Field::Track && p.raw_track.is_some() {
            self.raw_track = Some(value.to_string());
        }
    }

    fn save(&mut self) -> Result<()> {
        self.tag
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| tag_error(&self.path, format!("Failed to write: {}", e)))?;
        debug!(path = %self.path.display(), "tag saved");
        Ok(())
    }
}

/// First value of a FLAC Vorbis comment, key matched case-insensitively
fn read_raw_comment(path: &Path, key: &str) -> Result<Option<String>> {
    let tag = metaflac::Tag::read_from_path(path)
        .map_err(|e| tag_error(path, format!("Failed to read comments: {}", e)))?;

    Ok(tag.vorbis_comments().and_then(|comments| {
        comments
            .comments
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .and_then(|(_, values)| values.first())
            .cloned()
    }))
}

fn tag_error(path: &Path, message: String) -> Error {
    Error::Tag {
        path: path.to_path_buf(),
        message,
    }
}

#[cfg(test)]
mod fixtures;
