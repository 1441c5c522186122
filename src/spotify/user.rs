use reqwest::Client;

use crate::{
    spotify::{SpotifyError, check_response},
    types::CurrentUser,
};

/// Retrieves the profile of the user the token belongs to.
///
/// Uses Spotify's `/me` endpoint. The returned id is the owner for newly
/// created playlists.
pub async fn current_user(
    client: &Client,
    api_url: &str,
    token: &str,
) -> Result<CurrentUser, SpotifyError> {
    let url = format!("{api_url}/me");
    let response = client.get(&url).bearer_auth(token).send().await?;
    let response = check_response(response).await?;

    Ok(response.json::<CurrentUser>().await?)
}
