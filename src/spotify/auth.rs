use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config::{Config, SpotifyConfig},
    info,
    management::TokenManager,
    server,
    spotify::{SpotifyError, check_response},
    types::{PkceToken, Token},
    utils, warning,
};

const AUTH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    #[serde(default)]
    scope: String,
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh_token: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh_token.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope,
            expires_in: self.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Runs the complete OAuth 2.0 PKCE authorization flow and caches the token.
///
/// 1. Generates a code verifier and its S256 challenge
/// 2. Starts the local callback server on the configured address
/// 3. Opens the authorization URL in the default browser
/// 4. Waits up to 60 seconds for the callback to exchange the code
/// 5. Persists the token so later runs can skip this flow
///
/// # Errors
///
/// Returns `SpotifyError::Auth` when the callback server cannot bind, the user
/// denies access, the flow times out or the token cannot be saved.
pub async fn authorize(config: &Config) -> Result<Token, SpotifyError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(Some(PkceToken {
        code_verifier,
        token: None,
    })));

    let listener = server::bind(&config.server_addr)
        .await
        .map_err(SpotifyError::Auth)?;
    let server_state = Arc::clone(&shared_state);
    let spotify_config = Arc::new(config.spotify.clone());
    let server = tokio::spawn(async move {
        server::start_api_server(listener, server_state, spotify_config).await
    });

    let auth_url = authorize_url(&config.spotify, &code_challenge)?;
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    } else {
        info!("Waiting for authorization in the browser...");
    }

    let token = wait_for_token(shared_state, AUTH_TIMEOUT).await;
    server.abort();

    let token =
        token.ok_or_else(|| SpotifyError::Auth("authorization failed or timed out".to_string()))?;

    TokenManager::new(token.clone(), config.spotify.clone())
        .persist()
        .await
        .map_err(|e| SpotifyError::Auth(format!("failed to save token: {e}")))?;

    Ok(token)
}

/// Builds the URL of the authorization page the user is sent to.
pub fn authorize_url(config: &SpotifyConfig, code_challenge: &str) -> Result<Url, SpotifyError> {
    let scope = config.scope();
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", scope.as_str()),
        ],
    )
    .map_err(|e| SpotifyError::Auth(format!("invalid authorization url: {e}")))
}

/// Polls the shared state until the callback handler stored a token or the
/// timeout elapses.
async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    max_wait: Duration,
) -> Option<Token> {
    let start = tokio::time::Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|p| p.token.as_ref()) {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a new access token.
///
/// Spotify may or may not rotate the refresh token; when the response carries
/// none, the previous one is kept.
pub async fn refresh_token(
    config: &SpotifyConfig,
    refresh_token: &str,
) -> Result<Token, SpotifyError> {
    let request = Client::new().post(&config.token_url).form(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", config.client_id.as_str()),
    ]);
    let request = match &config.client_secret {
        Some(secret) => request.basic_auth(&config.client_id, Some(secret)),
        None => request,
    };

    let response = check_response(request.send().await?)
        .await
        .map_err(into_auth_error)?;
    let json = response.json::<TokenResponse>().await?;

    Ok(json.into_token(Some(refresh_token)))
}

/// Exchanges an authorization code for an access token using the PKCE
/// verifier generated at the start of the flow.
pub async fn exchange_code_pkce(
    config: &SpotifyConfig,
    code: &str,
    verifier: &str,
) -> Result<Token, SpotifyError> {
    let request = Client::new().post(&config.token_url).form(&[
        ("grant_type", "authorization_code"),
        ("client_id", config.client_id.as_str()),
        ("code", code),
        ("code_verifier", verifier),
        ("redirect_uri", config.redirect_uri.as_str()),
    ]);
    let request = match &config.client_secret {
        Some(secret) => request.basic_auth(&config.client_id, Some(secret)),
        None => request,
    };

    let response = check_response(request.send().await?)
        .await
        .map_err(into_auth_error)?;
    let json = response.json::<TokenResponse>().await?;

    Ok(json.into_token(None))
}

// The token endpoint answers 400 for invalid grants.
fn into_auth_error(err: SpotifyError) -> SpotifyError {
    match err {
        SpotifyError::Fatal(detail) => SpotifyError::Auth(detail),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOverrides;

    #[test]
    fn test_authorize_url_encodes_parameters() {
        let cfg = Config::from_lookup(
            |k| (k == "SPOTIFY_API_AUTH_CLIENT_ID").then(|| "client".to_string()),
            &ConfigOverrides::default(),
        )
        .unwrap();

        let url = authorize_url(&cfg.spotify, "challenge").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert!(pairs.contains(&("client_id".to_string(), "client".to_string())));
        assert!(pairs.contains(&("code_challenge_method".to_string(), "S256".to_string())));
        assert!(pairs.contains(&(
            "scope".to_string(),
            "playlist-modify-public playlist-modify-private".to_string()
        )));
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "http://127.0.0.1:8000/callback".to_string()
        )));
    }

    #[test]
    fn test_token_response_keeps_previous_refresh_token() {
        let json = r#"{"access_token":"new","scope":"a b","expires_in":1800}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        let token = response.into_token(Some("old-refresh"));

        assert_eq!(token.access_token, "new");
        assert_eq!(token.refresh_token, "old-refresh");
        assert_eq!(token.expires_in, 1800);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_token_times_out() {
        let state = Arc::new(Mutex::new(Some(PkceToken {
            code_verifier: "v".to_string(),
            token: None,
        })));
        assert!(wait_for_token(state, Duration::from_secs(3)).await.is_none());
    }
}
