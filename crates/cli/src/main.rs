mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "album-tidy")]
#[command(version, about = "Normalize a music library of album directories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Rename, flatten and clean every album directory under ROOT
    Tidy {
        /// Directory whose subdirectories are albums
        root: PathBuf,

        /// Log every action taken
        #[arg(short, long)]
        verbose: bool,

        /// Delete disallowed files and empty directories without asking
        #[arg(short, long)]
        delete_auth: bool,

        /// Fetch missing or wrongly sized cover art from Spotify
        ///
        /// Credentials come from SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET or
        /// from `album-tidy configure`.
        #[arg(short = 's', long)]
        fetch_artwork: bool,
    },

    /// Store Spotify client credentials in the user config file
    ///
    /// Create an app at: https://developer.spotify.com/dashboard
    Configure,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,album_tidy_organizer=debug,album_tidy_tags=debug,album_tidy_artwork=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Tidy {
            root,
            verbose,
            delete_auth,
            fetch_artwork,
        } => {
            init_logging(verbose);
            commands::tidy::run(root, verbose, delete_auth, fetch_artwork)
        }
        Command::Configure => commands::configure::run(),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "album-tidy", &mut io::stdout());
            Ok(())
        }
    }
}
