use album_tidy_artwork::{CoverArt, SpotifyClient};
use album_tidy_core::config::{config_path, load_user_config, resolve_credentials};
use album_tidy_core::{Confirm, RunConfig};
use album_tidy_organizer::{AlbumPipeline, AlbumReport, RunReport};
use album_tidy_tags::LoftyTagReader;
use anyhow::{Context, Result};
use std::path::PathBuf;

use super::read_input;

/// Asks on the terminal; anything but `y` is a no
struct ConsolePrompt;

impl Confirm for ConsolePrompt {
    fn confirm(&mut self, prompt: &str) -> bool {
        read_input(&format!("{} (y/N): ", prompt))
            .map(|answer| answer.eq_ignore_ascii_case("y"))
            .unwrap_or(false)
    }
}

pub fn run(root: PathBuf, verbose: bool, delete_auth: bool, fetch_artwork: bool) -> Result<()> {
    let config = RunConfig {
        verbose,
        delete_auth,
        fetch_artwork,
        ..RunConfig::new(root)
    };

    if !config.root.is_dir() {
        anyhow::bail!("Root directory does not exist: {}", config.root.display());
    }

    let mut artwork = if config.fetch_artwork {
        let user_config = load_user_config(config_path()?).context("Failed to load config file")?;
        let credentials = resolve_credentials(user_config.as_ref(), |key| std::env::var(key).ok())
            .context("Spotify credentials are required for --fetch-artwork")?;
        CoverArt::fetching(Box::new(SpotifyClient::new(credentials)?))
    } else {
        CoverArt::check_only()
    };

    println!("🎵 Tidying albums in: {}", config.root.display());
    if config.delete_auth {
        println!("   Deleting disallowed files without asking");
    }
    println!();

    let mut prompt = ConsolePrompt;
    let report = AlbumPipeline::new(&config, &LoftyTagReader, &mut prompt)
        .with_artwork(&mut artwork)
        .run()
        .with_context(|| format!("Failed to process {}", config.root.display()))?;

    for line in summary_lines(&report, config.verbose) {
        println!("{}", line);
    }

    Ok(())
}

fn album_lines(album: &AlbumReport, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();

    let marker = if album.needs_attention() { "⚠️ " } else { "✓" };
    lines.push(format!("{} {}", marker, album.album_dir.display()));

    if verbose {
        if let Some((from, to)) = &album.renamed_dir {
            lines.push(format!("   renamed from '{}' to '{}'", from, to));
        }
        for (from, to) in &album.renamed_files {
            lines.push(format!("   {} → {}", from, to));
        }
        for path in &album.deleted_files {
            lines.push(format!("   deleted {}", path.display()));
        }
        for path in &album.removed_dirs {
            lines.push(format!("   removed {}", path.display()));
        }
    }

    for path in &album.kept_files {
        lines.push(format!("   kept {}", path.display()));
    }
    for warning in &album.warnings {
        lines.push(format!("   {}", warning));
    }
    for error in &album.errors {
        lines.push(format!("   ❌ {}", error));
    }
    if let Some(artwork) = &album.artwork
        && (verbose || artwork.needs_attention())
    {
        lines.push(format!("   {}", artwork));
    }

    lines
}

/// Per-album lines followed by totals.
///
/// Albums with nothing to report are only listed in verbose mode.
fn summary_lines(report: &RunReport, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();

    for album in &report.albums {
        if verbose || album.needs_attention() {
            lines.extend(album_lines(album, verbose));
        }
    }

    let attention = report.needing_attention().count();
    lines.push(String::new());
    lines.push(format!(
        "✅ {} albums processed, {} changes, {} errors",
        report.albums.len(),
        report.changes(),
        report.error_count()
    ));
    if attention > 0 {
        lines.push(format!("⚠️  {} albums need manual attention", attention));
    }

    lines
}
