use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the Spotify client id
pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";

/// Environment variable holding the Spotify client secret
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Settings for one run, built from the command line and passed explicitly
/// to every stage of the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory whose immediate subdirectories are album directories
    pub root: PathBuf,
    pub verbose: bool,
    /// Delete disallowed files and empty directories without asking
    pub delete_auth: bool,
    /// Replace missing or invalid covers from the image search provider
    pub fetch_artwork: bool,
}

impl RunConfig {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            verbose: false,
            delete_auth: false,
            fetch_artwork: false,
        }
    }
}

/// User configuration file (`~/.album-tidy/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify: Option<SpotifyCredentials>,
}

/// Client credentials for the Spotify Web API
#[derive(Clone, Serialize, Deserialize)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Get path to the user config file
pub fn config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| Error::ConfigParse("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".album-tidy").join("config.toml"))
}

/// Parse user config from a string (useful for testing)
pub fn parse_user_config_str(content: &str) -> Result<UserConfig> {
    let config: UserConfig = toml::from_str(content)?;
    if let Some(spotify) = &config.spotify {
        validate_credential(&spotify.client_id, "spotify.client_id")?;
        validate_credential(&spotify.client_secret, "spotify.client_secret")?;
    }
    Ok(config)
}

/// Load user config, `None` if the file does not exist
pub fn load_user_config<P: AsRef<Path>>(path: P) -> Result<Option<UserConfig>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    parse_user_config_str(&content).map(Some)
}

/// Save user config, creating the parent directory if needed
pub fn save_user_config<P: AsRef<Path>>(path: P, config: &UserConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}

/// Resolve Spotify credentials.
///
/// Each value is taken from the environment first (via `lookup`, normally
/// `std::env::var`), then from the user config file.
pub fn resolve_credentials<F>(file: Option<&UserConfig>, lookup: F) -> Result<SpotifyCredentials>
where
    F: Fn(&str) -> Option<String>,
{
    let from_file = file.and_then(|c| c.spotify.as_ref());

    let pick = |env_key: &str, file_value: Option<&String>| -> Result<String> {
        let value = lookup(env_key)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| file_value.cloned())
            .ok_or_else(|| {
                Error::MissingCredentials(format!(
                    "set {} or run 'album-tidy configure'",
                    env_key
                ))
            })?;
        validate_credential(&value, env_key)?;
        Ok(value)
    };

    Ok(SpotifyCredentials {
        client_id: pick(CLIENT_ID_ENV, from_file.map(|s| &s.client_id))?,
        client_secret: pick(CLIENT_SECRET_ENV, from_file.map(|s| &s.client_secret))?,
    })
}

fn validate_credential(value: &str, field_name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty value in '{}'",
            field_name
        )));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(Error::ConfigParse(format!(
            "Whitespace not allowed in '{}'",
            field_name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_user_config() {
        let toml = r#"
[spotify]
client_id = "abc123"
client_secret = "s3cr3t"
        "#;

        let config = parse_user_config_str(toml).unwrap();
        let spotify = config.spotify.unwrap();
        assert_eq!(spotify.client_id, "abc123");
        assert_eq!(spotify.client_secret, "s3cr3t");
    }

    #[test]
    fn test_parse_empty_user_config() {
        let config = parse_user_config_str("").unwrap();
        assert!(config.spotify.is_none());
    }

    #[test]
    fn test_parse_user_config_rejects_empty_secret() {
        let toml = r#"
[spotify]
client_id = "abc123"
client_secret = "  "
        "#;

        let result = parse_user_config_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("spotify.client_secret"));
    }

    #[test]
    fn test_parse_user_config_invalid_toml() {
        let result = parse_user_config_str("[spotify\nclient_id = ");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(load_user_config(&path).unwrap().is_none());

        let config = UserConfig {
            spotify: Some(SpotifyCredentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            }),
        };
        save_user_config(&path, &config).unwrap();

        let loaded = load_user_config(&path).unwrap().unwrap();
        assert_eq!(loaded.spotify.unwrap().client_id, "id");
    }

    #[test]
    fn test_resolve_credentials_prefers_environment() {
        let file = parse_user_config_str(
            "[spotify]\nclient_id = \"file-id\"\nclient_secret = \"file-secret\"\n",
        )
        .unwrap();
        let lookup = env(&[(CLIENT_ID_ENV, "env-id")]);

        let creds = resolve_credentials(Some(&file), lookup).unwrap();
        assert_eq!(creds.client_id, "env-id");
        assert_eq!(creds.client_secret, "file-secret");
    }

    #[test]
    fn test_resolve_credentials_env_only() {
        let lookup = env(&[(CLIENT_ID_ENV, "id"), (CLIENT_SECRET_ENV, "secret")]);
        let creds = resolve_credentials(None, lookup).unwrap();
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "secret");
    }

    #[test]
    fn test_resolve_credentials_missing() {
        let result = resolve_credentials(None, env(&[(CLIENT_ID_ENV, "id")]));
        assert!(matches!(result, Err(Error::MissingCredentials(_))));
        assert!(result.unwrap_err().to_string().contains(CLIENT_SECRET_ENV));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = SpotifyCredentials {
            client_id: "id".to_string(),
            client_secret: "top-secret".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("redacted"));
    }
}
