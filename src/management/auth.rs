use std::path::PathBuf;

use chrono::Utc;

use crate::{
    config::{self, SpotifyConfig},
    spotify::{self, SpotifyError},
    types::Token,
};

/// Seconds before the nominal expiry at which a token is refreshed.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Holds the current OAuth token and keeps it fresh.
pub struct TokenManager {
    token: Token,
    config: SpotifyConfig,
}

impl TokenManager {
    pub fn new(token: Token, config: SpotifyConfig) -> Self {
        TokenManager { token, config }
    }

    /// Loads the cached token from `<data dir>/cache/token.json`.
    ///
    /// # Errors
    ///
    /// Returns an error message when the cache file is missing or does not
    /// contain a token, in which case the caller runs the authorization flow.
    pub async fn load(config: SpotifyConfig) -> Result<Self, String> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { token, config })
    }

    /// Writes the token to the cache file, creating the cache directory when
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error message when the directory or file cannot be written.
    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    /// Returns an access token, refreshing and persisting it first when it is
    /// about to expire.
    pub async fn get_valid_token(&mut self) -> Result<String, SpotifyError> {
        if self.is_expired_at(Utc::now().timestamp() as u64) {
            let refreshed =
                spotify::auth::refresh_token(&self.config, &self.token.refresh_token).await?;
            self.token = refreshed;
            // a failed write only costs another refresh next run
            let _ = self.persist().await;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        let expires_at = self.token.obtained_at + self.token.expires_in;
        now >= expires_at.saturating_sub(EXPIRY_MARGIN_SECS)
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigOverrides};

    fn manager(obtained_at: u64, expires_in: u64) -> TokenManager {
        let cfg = Config::from_lookup(
            |k| (k == "SPOTIFY_API_AUTH_CLIENT_ID").then(|| "id".to_string()),
            &ConfigOverrides::default(),
        )
        .unwrap();
        TokenManager::new(
            Token {
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
                scope: String::new(),
                expires_in,
                obtained_at,
            },
            cfg.spotify,
        )
    }

    #[test]
    fn test_expiry_margin() {
        let mgr = manager(1_000, 3_600);
        assert!(!mgr.is_expired_at(1_000));
        assert!(!mgr.is_expired_at(4_359));
        assert!(mgr.is_expired_at(4_360));
    }

    #[test]
    fn test_short_lived_token_is_expired() {
        let mgr = manager(1_000, 100);
        assert!(mgr.is_expired_at(1_000));
    }
}
