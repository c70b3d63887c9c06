//! Album cover validation and replacement.

pub mod cover;
pub mod process;
pub mod spotify;

pub use cover::{CoverArt, CoverSource};
pub use process::{TARGET_SIZE, square_cover};
pub use spotify::SpotifyClient;
