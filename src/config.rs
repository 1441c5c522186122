//! Configuration management for spotlist.
//!
//! Configuration is collected once into a [`Config`] value and passed
//! explicitly to everything that needs it. Values are resolved in this order:
//! 1. Command-line overrides (highest priority)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8000/callback";
pub const DEFAULT_SCOPE: &str = "playlist-modify-public playlist-modify-private";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("cannot prepare data directory: {0}")]
    DataDir(String),
    #[error("cannot load .env file: {0}")]
    EnvFile(String),
}

/// Spotify application credentials and endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
}

impl SpotifyConfig {
    /// Scopes joined the way the authorize endpoint expects them.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub spotify: SpotifyConfig,
    /// Bind address of the local OAuth callback server.
    pub server_addr: String,
}

/// Values given on the command line that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok(), overrides)
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset, so a blank line in `.env` falls
    /// back to the default.
    pub fn from_lookup<F>(lookup: F, overrides: &ConfigOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = overrides
            .client_id
            .clone()
            .or_else(|| get("SPOTIFY_API_AUTH_CLIENT_ID"))
            .ok_or(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"))?;

        let client_secret = overrides
            .client_secret
            .clone()
            .or_else(|| get("SPOTIFY_API_AUTH_CLIENT_SECRET"));

        let redirect_uri = overrides
            .redirect_uri
            .clone()
            .or_else(|| get("SPOTIFY_API_REDIRECT_URI"))
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        let scopes = get("SPOTIFY_API_AUTH_SCOPE")
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Ok(Self {
            spotify: SpotifyConfig {
                client_id,
                client_secret,
                redirect_uri,
                scopes,
                api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                auth_url: get("SPOTIFY_API_AUTH_URL")
                    .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
                token_url: get("SPOTIFY_API_TOKEN_URL")
                    .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            },
            server_addr: get("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
        })
    }
}

/// Returns the application directory inside the platform local data directory.
///
/// - Linux: `~/.local/share/spotlist`
/// - macOS: `~/Library/Application Support/spotlist`
/// - Windows: `%LOCALAPPDATA%/spotlist`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotlist");
    path
}

/// Loads environment variables from `.env` in the local data directory.
///
/// The directory is created if it does not exist. A missing `.env` file is
/// not an error since every value can also come from the process environment
/// or the command line.
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| ConfigError::DataDir(e.to_string()))?;

    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| ConfigError::EnvFile(e.to_string()))
}
