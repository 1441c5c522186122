use reqwest::Client;

use crate::{
    spotify::{SpotifyError, check_response},
    types::{SearchResponse, SongRequest, Track},
};

/// Builds a query that scopes the title to the track field and appends the
/// context as free text, e.g. `track:"Kesariya" Brahmastra`.
pub fn scoped_query(request: &SongRequest) -> String {
    let title = request.title.replace('"', "");
    if request.context.is_empty() {
        format!("track:\"{title}\"")
    } else {
        format!("track:\"{title}\" {}", request.context)
    }
}

/// Searches the catalog for tracks matching `query`.
///
/// Uses Spotify's `/search` endpoint with `type=track`. A single attempt is
/// made; rate limiting and retries are the caller's concern, see
/// [`crate::retry::search_with_retry`].
///
/// # Errors
///
/// - `SpotifyError::RateLimited` on HTTP 429 with the `Retry-After` value
/// - `SpotifyError::Transient` on network failures and 5xx responses
/// - `SpotifyError::Fatal` or `SpotifyError::Auth` on other rejections
pub async fn search_tracks(
    client: &Client,
    api_url: &str,
    token: &str,
    query: &str,
    limit: u32,
) -> Result<Vec<Track>, SpotifyError> {
    let url = format!("{api_url}/search");
    let response = client
        .get(&url)
        .bearer_auth(token)
        .query(&[("q", query), ("type", "track"), ("limit", &limit.to_string())])
        .send()
        .await?;
    let response = check_response(response).await?;

    let json = response.json::<SearchResponse>().await?;
    Ok(json.into_tracks())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_query() {
        let request = SongRequest::new("Kesariya", "Brahmastra");
        assert_eq!(scoped_query(&request), "track:\"Kesariya\" Brahmastra");
    }

    #[test]
    fn test_scoped_query_without_context() {
        let request = SongRequest::new("Tum Hi Ho", "");
        assert_eq!(scoped_query(&request), "track:\"Tum Hi Ho\"");
    }

    #[test]
    fn test_scoped_query_drops_inner_quotes() {
        let request = SongRequest::new("Say \"Hi\"", "Band");
        assert_eq!(scoped_query(&request), "track:\"Say Hi\" Band");
    }

    #[test]
    fn test_null_items_are_skipped() {
        let json = r#"{
            "tracks": {
                "items": [
                    null,
                    {
                        "id": "abc",
                        "name": "Kesariya",
                        "uri": "spotify:track:abc",
                        "artists": [{ "id": "a1", "name": "Arijit Singh" }]
                    },
                    null
                ]
            }
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let tracks = response.into_tracks();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].uri, "spotify:track:abc");
        assert_eq!(tracks[0].first_artist(), "Arijit Singh");
    }

    #[test]
    fn test_missing_tracks_page_is_empty() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_tracks().is_empty());
    }
}
