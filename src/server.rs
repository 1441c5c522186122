use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, config::SpotifyConfig, types::PkceToken};

/// Binds the callback server address, e.g. `127.0.0.1:8000`.
pub async fn bind(addr: &str) -> Result<TcpListener, String> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("Failed to parse server address {addr}: {e}"))?;

    TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))
}

pub fn router(state: Arc<Mutex<Option<PkceToken>>>, config: Arc<SpotifyConfig>) -> Router {
    Router::new().route("/health", get(api::health)).route(
        "/callback",
        get(api::callback)
            .layer::<_, std::convert::Infallible>(Extension(state))
            .layer(Extension(config)),
    )
}

pub async fn start_api_server(
    listener: TcpListener,
    state: Arc<Mutex<Option<PkceToken>>>,
    config: Arc<SpotifyConfig>,
) -> Result<(), String> {
    axum::serve(listener, router(state, config))
        .await
        .map_err(|e| e.to_string())
}
