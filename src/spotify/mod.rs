//! # Spotify Integration Module
//!
//! Interface to the Spotify Web API used by spotlist: authentication, track
//! search and playlist management.
//!
//! ```text
//! Pipeline / CLI
//!          ↓
//! CatalogService (trait)
//!          ↓
//! SpotifyClient
//!     ├── auth      (OAuth 2.0 PKCE, token refresh)
//!     ├── user      (current user profile)
//!     ├── search    (track search)
//!     └── playlist  (create, add items)
//!          ↓
//! Spotify Web API
//! ```
//!
//! The pipeline only depends on [`CatalogService`], so it can run against any
//! implementation of the trait. [`SpotifyClient`] is the production one.

pub mod auth;
mod client;
mod error;
pub mod playlist;
pub mod search;
pub mod user;

use async_trait::async_trait;

pub use client::SpotifyClient;
pub use error::{SpotifyError, check_response, retry_after_secs};

use crate::types::{CreatePlaylistRequest, CreatePlaylistResponse, CurrentUser, Track};

/// Maximum number of items the add-items endpoint accepts per call.
pub const MAX_BATCH_SIZE: usize = 100;

/// Number of search results requested per query.
pub const SEARCH_LIMIT: u32 = 5;

/// The catalog and playlist operations the pipeline needs.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn current_user(&self) -> Result<CurrentUser, SpotifyError>;

    async fn create_playlist(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, SpotifyError>;

    /// Searches tracks, returning them in the order the service ranks them.
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, SpotifyError>;

    /// Adds at most [`MAX_BATCH_SIZE`] items to a playlist.
    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), SpotifyError>;
}
