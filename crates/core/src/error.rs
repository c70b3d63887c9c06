use std::path::PathBuf;

use crate::types::Field;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing {field} tag in {}", path.display())]
    MissingTag { field: Field, path: PathBuf },

    #[error("Malformed track number '{0}'")]
    MalformedTrackNumber(String),

    #[error("Malformed disc number '{0}'")]
    MalformedDiscNumber(String),

    #[error("Refusing to overwrite {} with {}", to.display(), from.display())]
    RenameCollision { from: PathBuf, to: PathBuf },

    #[error("Unsupported audio format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Tag error in {}: {message}", path.display())]
    Tag { path: PathBuf, message: String },

    #[error("No artwork found for {artist} - {album}")]
    ArtworkLookupMiss { artist: String, album: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
