use std::sync::Arc;

use crate::{
    cli::{
        input::{RunOptions, load_songs, resolve_playlist_name},
        progress::follow,
    },
    config::Config,
    error, info,
    pipeline::Pipeline,
    spotify::{SpotifyClient, SpotifyError},
    success,
    types::{PipelineOutcome, PlaylistHandle},
    utils, warning,
    worker::Worker,
};

pub async fn create(config: Config, opts: RunOptions) {
    let Some(playlist_name) =
        resolve_playlist_name(opts.playlist_name.as_deref(), opts.song_file.as_deref())
    else {
        error!("Please provide a playlist name.");
    };

    let songs = load_songs(&opts).await;
    info!("Playlist name: {}", playlist_name);

    let client = match SpotifyClient::connect(&config).await {
        Ok(client) => client,
        Err(e) => error!("Cannot connect to Spotify: {}", e),
    };

    let description = utils::playlist_description(opts.song_file.as_deref(), false);
    let public = opts.public;
    let total = songs.len();

    let worker = Worker::new();
    let handle = match worker.spawn(move |sink| async move {
        let pipeline = Pipeline::new(Arc::new(client), sink);
        let (_, playlist) = pipeline
            .create_playlist(&playlist_name, public, &description)
            .await?;
        let outcome = pipeline.run(&playlist, &songs).await;
        Ok::<_, SpotifyError>((playlist, outcome))
    }) {
        Ok(handle) => handle,
        Err(e) => error!("{}", e),
    };

    match follow(handle, total).await {
        Ok(Ok((playlist, outcome))) => print_summary(&playlist, &outcome),
        Ok(Err(e)) => error!("Error during operation: {}", e),
        Err(e) => error!("{}", e),
    }
}

pub(crate) fn print_summary(playlist: &PlaylistHandle, outcome: &PipelineOutcome) {
    if outcome.added_count > 0 {
        success!(
            "Successfully added {} songs to the playlist!",
            outcome.added_count
        );
    }

    if !outcome.unmatched.is_empty() {
        warning!("Could not find {} songs:", outcome.unmatched.len());
        for song in &outcome.unmatched {
            println!("  - {}", song);
        }
    }

    info!(
        "Summary: {} songs added, {} not found",
        outcome.added_count,
        outcome.unmatched.len()
    );
    success!("Your playlist is ready! Open it here: {}", playlist.external_url);
}
