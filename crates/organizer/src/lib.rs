//! Album directory normalization: flattening, track and directory renaming,
//! and disposal of files that do not belong in an album.

pub mod flatten;
pub mod fs_ops;
pub mod pipeline;
pub mod report;

pub use flatten::{FlattenOutcome, flatten_dir};
pub use pipeline::AlbumPipeline;
pub use report::{AlbumReport, RunReport};

use album_tidy_core::{Confirm, RunConfig};

/// Blanket authorization wins; otherwise ask.
pub(crate) fn approve(config: &RunConfig, confirm: &mut dyn Confirm, prompt: &str) -> bool {
    config.delete_auth || confirm.confirm(prompt)
}

#[cfg(test)]
pub(crate) mod testing;
