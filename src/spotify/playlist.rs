use reqwest::Client;

use crate::{
    spotify::{MAX_BATCH_SIZE, SpotifyError, check_response},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse,
    },
};

/// Creates a playlist owned by `owner_id`.
///
/// Uses Spotify's `/users/{id}/playlists` endpoint. The response carries the
/// playlist id used for adding items and the public URL shown to the user.
pub async fn create(
    client: &Client,
    api_url: &str,
    token: &str,
    owner_id: &str,
    request: &CreatePlaylistRequest,
) -> Result<CreatePlaylistResponse, SpotifyError> {
    let url = format!("{api_url}/users/{owner_id}/playlists");
    let response = client
        .post(&url)
        .bearer_auth(token)
        .json(request)
        .send()
        .await?;
    let response = check_response(response).await?;

    Ok(response.json::<CreatePlaylistResponse>().await?)
}

/// Appends items to a playlist.
///
/// Uses Spotify's `/playlists/{id}/tracks` endpoint, which accepts at most
/// [`MAX_BATCH_SIZE`] URIs per call. Larger inputs are rejected here rather
/// than by the service.
pub async fn add_tracks(
    client: &Client,
    api_url: &str,
    token: &str,
    playlist_id: &str,
    uris: &[String],
) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
    if uris.len() > MAX_BATCH_SIZE {
        return Err(SpotifyError::Fatal(format!(
            "batch of {} items exceeds the limit of {}",
            uris.len(),
            MAX_BATCH_SIZE
        )));
    }

    let url = format!("{api_url}/playlists/{playlist_id}/tracks");
    let body = AddTrackToPlaylistRequest {
        uris: uris.to_vec(),
    };
    let response = client
        .post(&url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;
    let response = check_response(response).await?;

    Ok(response.json::<AddTrackToPlaylistResponse>().await?)
}
