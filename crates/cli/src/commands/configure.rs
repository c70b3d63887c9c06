use album_tidy_core::config::{config_path, load_user_config, save_user_config};
use album_tidy_core::{SpotifyCredentials, UserConfig};
use anyhow::{Context, Result};

use super::read_input;

/// Keep the current value when the operator just presses Enter
fn with_default(input: String, current: Option<&str>) -> String {
    match current {
        Some(current) if input.is_empty() => current.to_string(),
        _ => input,
    }
}

/// Show only the first few characters of a secret
fn masked(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    format!("{}...", shown)
}

/// Prompt for Spotify client credentials and store them in the user config
pub fn run() -> Result<()> {
    println!("🔧 Configuring Spotify artwork lookup...\n");

    let path = config_path()?;
    let existing = load_user_config(&path)
        .context("Failed to load config file")?
        .unwrap_or_default();
    let current = existing.spotify.as_ref();

    println!("📋 You'll need a Spotify app's client id and secret");
    println!("   Create one at: https://developer.spotify.com/dashboard");
    println!("   Environment variables SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET override these.");
    println!();

    let client_id = match current {
        Some(c) => read_input(&format!("Client ID [current: {}]: ", c.client_id))?,
        None => read_input("Client ID: ")?,
    };
    let client_id = with_default(client_id, current.map(|c| c.client_id.as_str()));
    if client_id.is_empty() {
        anyhow::bail!("Client ID is required");
    }

    let client_secret = match current {
        Some(c) => read_input(&format!("Client Secret [current: {}]: ", masked(&c.client_secret)))?,
        None => read_input("Client Secret: ")?,
    };
    let client_secret = with_default(client_secret, current.map(|c| c.client_secret.as_str()));
    if client_secret.is_empty() {
        anyhow::bail!("Client Secret is required");
    }

    let config = UserConfig {
        spotify: Some(SpotifyCredentials {
            client_id,
            client_secret,
        }),
    };

    save_user_config(&path, &config).context("Failed to write config file")?;
    println!("✅ Configuration saved to: {}", path.display());

    Ok(())
}
