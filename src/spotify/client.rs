use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    management::TokenManager,
    spotify::{self, CatalogService, SpotifyError},
    types::{CreatePlaylistRequest, CreatePlaylistResponse, CurrentUser, Track},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`CatalogService`] backed by the Spotify Web API.
///
/// A client is built fresh for every run and owned by the worker executing
/// it. The token manager sits behind a mutex so an expiring token can be
/// refreshed from `&self`.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(api_url: &str, tokens: TokenManager) -> Result<Self, SpotifyError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| SpotifyError::Fatal(format!("build client: {e}")))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        })
    }

    /// Builds a client from the cached token, running the interactive
    /// authorization flow first when no token is cached.
    pub async fn connect(config: &Config) -> Result<Self, SpotifyError> {
        let tokens = match TokenManager::load(config.spotify.clone()).await {
            Ok(tokens) => tokens,
            Err(_) => {
                let token = spotify::auth::authorize(config).await?;
                TokenManager::new(token, config.spotify.clone())
            }
        };

        Self::new(&config.spotify.api_url, tokens)
    }

    async fn bearer(&self) -> Result<String, SpotifyError> {
        self.tokens.lock().await.get_valid_token().await
    }
}

#[async_trait]
impl CatalogService for SpotifyClient {
    async fn current_user(&self) -> Result<CurrentUser, SpotifyError> {
        let token = self.bearer().await?;
        spotify::user::current_user(&self.http, &self.api_url, &token).await
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        let token = self.bearer().await?;
        spotify::playlist::create(&self.http, &self.api_url, &token, owner_id, request).await
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, SpotifyError> {
        let token = self.bearer().await?;
        spotify::search::search_tracks(&self.http, &self.api_url, &token, query, limit).await
    }

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), SpotifyError> {
        let token = self.bearer().await?;
        spotify::playlist::add_tracks(&self.http, &self.api_url, &token, playlist_id, uris)
            .await
            .map(|_| ())
    }
}
