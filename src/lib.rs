//! Spotify Playlist Builder Library
//!
//! Turns plain-text song lists (`Song Title – Artist or Movie`, one per line)
//! into Spotify playlists. Each line is parsed into a song request, searched in
//! the Spotify catalog with retry and backoff, and the unique first matches are
//! added to a newly created playlist in batches.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment, `.env` and command-line flags
//! - `events` - Progress events and sinks the pipeline reports through
//! - `management` - Token caching and refresh
//! - `parser` - Song list parsing
//! - `pipeline` - Search, deduplicate and batch-submit pipeline
//! - `retry` - Search with retry and backoff
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client and the catalog service trait
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `worker` - Background worker running one pipeline at a time
//!
//! # Example
//!
//! ```
//! use spotlist::parser::{self, InputMode};
//!
//! let songs = parser::parse_text("Kesariya - Brahmastra", InputMode::File);
//! assert_eq!(songs[0].title, "Kesariya");
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod events;
pub mod management;
pub mod parser;
pub mod pipeline;
pub mod retry;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod worker;

/// Prints an informational line with a blue `o` bullet.
///
/// Accepts the same arguments as `println!`.
///
/// ```
/// info!("Reading songs from: {}", path.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line with a green checkmark.
///
/// ```
/// success!("Loaded {} songs from {}", songs.len(), path.display());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line with a red exclamation mark to stderr and exits the
/// process with status 1.
///
/// Only for failures that end the command, such as a missing song file or a
/// failed authorization. Code after the macro does not run.
///
/// ```
/// error!("No songs found or error reading input!");
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line with a yellow exclamation mark.
///
/// Used for problems the current command recovers from, e.g. a song that
/// could not be found or a batch the playlist rejected.
///
/// ```
/// warning!("Could not find {} songs", unmatched.len());
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
