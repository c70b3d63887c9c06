//! Canonical naming rules for tracks and album directories.
//!
//! Every function here is deterministic and idempotent so a second run over
//! an already tidied tree computes exactly the names that are on disk.

use crate::error::{Error, Result};

/// Characters that are illegal in a path component on at least one platform
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Remove reserved characters and ASCII control characters (0x00-0x1F).
///
/// Characters are deleted, never replaced:
///
/// ```text
/// sanitize("AC/DC")       → "ACDC"
/// sanitize("What? Why:")  → "What Why"
/// ```
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| !RESERVED_CHARS.contains(c) && !matches!(*c, '\u{0}'..='\u{1F}'))
        .collect()
}

/// Clean a raw track-number tag and parse it.
///
/// Drops a `/total` suffix, then strips exactly one leading zero. Returns the
/// cleaned string (the form written back into the file) and its value.
///
/// ```text
/// "05"   → ("5", 5)
/// "5/12" → ("5", 5)
/// "007"  → ("07", 7)   only one zero is stripped per pass
/// ```
pub fn clean_track_number(raw: &str) -> Result<(String, u32)> {
    let head = raw.split_once('/').map_or(raw, |(head, _)| head);
    let cleaned = head.strip_prefix('0').unwrap_or(head);

    let number: u32 = cleaned
        .parse()
        .map_err(|_| Error::MalformedTrackNumber(raw.to_string()))?;
    if number == 0 {
        return Err(Error::MalformedTrackNumber(raw.to_string()));
    }

    Ok((cleaned.to_string(), number))
}

/// Build the (unsanitized) canonical file name for a track.
///
/// The number is padded to two digits. On a multi-disc album the disc index
/// is prepended with no separator, so disc 2 track 3 becomes `203`.
/// A missing disc tag, or one without a `/total` part, is a single disc.
pub fn generate_title(disc: Option<&str>, track: u32, title: &str, extension: &str) -> Result<String> {
    let mut number = if track < 10 {
        format!("0{}", track)
    } else {
        track.to_string()
    };

    if let Some(disc) = disc
        && let Some((index, total)) = disc.split_once('/')
    {
        let total: u32 = total
            .trim()
            .parse()
            .map_err(|_| Error::MalformedDiscNumber(disc.to_string()))?;
        if total > 1 {
            let index: u32 = index
                .trim()
                .parse()
                .map_err(|_| Error::MalformedDiscNumber(disc.to_string()))?;
            number = format!("{}{}", index, number);
        }
    }

    Ok(format!("{}. {}{}", number, title, extension))
}

/// Sanitized canonical file name for a track
pub fn track_file_name(disc: Option<&str>, track: u32, title: &str, extension: &str) -> Result<String> {
    Ok(sanitize(&generate_title(disc, track, title, extension)?))
}

/// Canonical album directory name: `<artist> - <album>`.
///
/// A single trailing period is dropped because several filesystems strip it
/// silently, which would otherwise trigger a rename on every run.
pub fn album_dir_name(artist: &str, album: &str) -> String {
    let mut name = format!("{} - {}", sanitize(artist), sanitize(album));
    if name.ends_with('.') {
        name.pop();
    }
    name
}
