pub mod config;
pub mod error;
pub mod naming;
pub mod types;

pub use config::{RunConfig, SpotifyCredentials, UserConfig};
pub use error::{Error, Result};
pub use types::*;
