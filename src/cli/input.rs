use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;

use crate::{
    error, info,
    parser::{self, InputMode},
    success,
    types::SongRequest,
};

/// Options shared by `create` and `preview`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub song_file: Option<PathBuf>,
    pub playlist_name: Option<String>,
    pub public: bool,
    /// Read free-text song lines from standard input instead of a file.
    pub manual: bool,
}

/// Reads the song requests for a run, exiting when there are none.
pub async fn load_songs(opts: &RunOptions) -> Vec<SongRequest> {
    let songs = if opts.manual {
        let mut text = String::new();
        if let Err(e) = tokio::io::stdin().read_to_string(&mut text).await {
            error!("Error reading standard input: {}", e);
        }
        parser::parse_text(&text, InputMode::Manual)
    } else {
        let Some(path) = opts.song_file.as_deref() else {
            error!("Please provide a song file or use --manual.");
        };
        info!("Reading songs from: {}", path.display());
        match parser::read_songs_from_file(path).await {
            Ok(songs) => {
                success!("Loaded {} songs from {}", songs.len(), path.display());
                songs
            }
            Err(e) => error!("{}", e),
        }
    };

    if songs.is_empty() {
        error!("No songs found or error reading input!");
    }

    songs
}

/// Picks the playlist name: an explicit non-blank name, otherwise the name
/// derived from the song file.
pub fn resolve_playlist_name(name: Option<&str>, song_file: Option<&Path>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .or_else(|| song_file.map(parser::default_playlist_name))
        .filter(|n| !n.is_empty())
}
