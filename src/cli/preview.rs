use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::{
        create::print_summary,
        input::{RunOptions, load_songs, resolve_playlist_name},
        progress::follow,
    },
    config::Config,
    error, info,
    pipeline::Pipeline,
    spotify::{SpotifyClient, SpotifyError},
    types::{MatchReport, MatchTableRow, PipelineOutcome},
    utils, warning,
    worker::Worker,
};

/// Searches every song without touching any playlist and prints the matches.
///
/// With `create_after` set, a playlist is created from the previewed matches
/// once the preview finished, reusing the same authorized client.
pub async fn preview(config: Config, opts: RunOptions, create_after: bool) {
    let playlist_name =
        resolve_playlist_name(opts.playlist_name.as_deref(), opts.song_file.as_deref());
    if create_after && playlist_name.is_none() {
        error!("Please provide a playlist name.");
    }

    let songs = load_songs(&opts).await;
    let total = songs.len();

    let client = match SpotifyClient::connect(&config).await {
        Ok(client) => Arc::new(client),
        Err(e) => error!("Cannot connect to Spotify: {}", e),
    };

    let worker = Worker::new();
    let preview_client = Arc::clone(&client);
    let handle = match worker.spawn(move |sink| async move {
        Pipeline::new(preview_client, sink)
            .match_requests(&songs)
            .await
    }) {
        Ok(handle) => handle,
        Err(e) => error!("{}", e),
    };

    let report = match follow(handle, total).await {
        Ok(report) => report,
        Err(e) => error!("{}", e),
    };

    print_report(playlist_name.as_deref(), &report);

    if !create_after {
        return;
    }
    let Some(playlist_name) = playlist_name else {
        return;
    };
    if report.matches.is_empty() {
        warning!("No matched tracks to create a playlist from.");
        return;
    }

    let description = utils::playlist_description(opts.song_file.as_deref(), true);
    let public = opts.public;
    let unmatched = report.unmatched.clone();
    let ids = report.track_ids();

    let handle = match worker.spawn(move |sink| async move {
        let pipeline = Pipeline::new(client, sink);
        let (_, playlist) = pipeline
            .create_playlist(&playlist_name, public, &description)
            .await?;
        let added_count = pipeline.submit(&playlist, ids).await;
        Ok::<_, SpotifyError>((
            playlist,
            PipelineOutcome {
                added_count,
                unmatched,
            },
        ))
    }) {
        Ok(handle) => handle,
        Err(e) => error!("{}", e),
    };

    match follow(handle, 0).await {
        Ok(Ok((playlist, outcome))) => print_summary(&playlist, &outcome),
        Ok(Err(e)) => error!("Error creating playlist from preview: {}", e),
        Err(e) => error!("{}", e),
    }
}

fn print_report(playlist_name: Option<&str>, report: &MatchReport) {
    info!(
        "Preview for playlist: {} - {} matches, {} not found",
        playlist_name.unwrap_or("(unnamed)"),
        report.matches.len(),
        report.unmatched.len()
    );

    if !report.matches.is_empty() {
        let rows: Vec<MatchTableRow> = report.matches.iter().map(MatchTableRow::from).collect();
        println!("{}", Table::new(rows));
    }

    if !report.unmatched.is_empty() {
        warning!("Not found:");
        for song in &report.unmatched {
            println!("  - {}", song);
        }
    }
}
