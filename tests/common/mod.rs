#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use spotlist::{
    retry::RetryPolicy,
    spotify::{CatalogService, SpotifyError},
    types::{
        CreatePlaylistRequest, CreatePlaylistResponse, CurrentUser, ExternalUrls, Track,
        TrackArtist,
    },
};

pub fn track(id: &str, name: &str, artist: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:track:{id}"),
        artists: vec![TrackArtist {
            id: None,
            name: artist.to_string(),
        }],
    }
}

pub fn uris(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("spotify:track:{i}")).collect()
}

/// Backoff of 1s, 2s, 4s without jitter.
pub fn fixed_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_backoff: Duration::from_secs(1),
        max_jitter: Duration::ZERO,
    }
}

/// Catalog with scripted search responses per query. Queries without a
/// script, or whose script ran out, return no results.
#[derive(Default)]
pub struct MockCatalog {
    scripts: Mutex<HashMap<String, VecDeque<Result<Vec<Track>, SpotifyError>>>>,
    failing_batches: Mutex<HashSet<usize>>,
    pub searches: Mutex<Vec<String>>,
    pub batches: Mutex<Vec<Vec<String>>>,
    pub created: Mutex<Vec<CreatePlaylistRequest>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, query: &str, responses: Vec<Result<Vec<Track>, SpotifyError>>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .extend(responses);
    }

    pub fn fail_batch(&self, index: usize) {
        self.failing_batches.lock().unwrap().insert(index);
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl CatalogService for MockCatalog {
    async fn current_user(&self) -> Result<CurrentUser, SpotifyError> {
        Ok(CurrentUser {
            id: "user-1".to_string(),
            display_name: Some("Test User".to_string()),
        })
    }

    async fn create_playlist(
        &self,
        _owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        self.created.lock().unwrap().push(request.clone());
        Ok(CreatePlaylistResponse {
            id: "playlist-1".to_string(),
            name: request.name.clone(),
            external_urls: ExternalUrls {
                spotify: "https://open.spotify.com/playlist/playlist-1".to_string(),
            },
        })
    }

    async fn search_tracks(&self, query: &str, _limit: u32) -> Result<Vec<Track>, SpotifyError> {
        self.searches.lock().unwrap().push(query.to_string());
        self.scripts
            .lock()
            .unwrap()
            .get_mut(query)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn add_items(&self, _playlist_id: &str, uris: &[String]) -> Result<(), SpotifyError> {
        let mut batches = self.batches.lock().unwrap();
        let index = batches.len();
        batches.push(uris.to_vec());

        if self.failing_batches.lock().unwrap().contains(&index) {
            return Err(SpotifyError::Transient("502 Bad Gateway".to_string()));
        }
        Ok(())
    }
}
