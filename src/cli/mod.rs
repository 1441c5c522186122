//! # CLI Module
//!
//! Command implementations for spotlist. Each command reads its input,
//! authenticates, starts the pipeline on the background [`Worker`] and renders
//! the events the run emits until it finishes.
//!
//! ## Commands
//!
//! - [`auth`] - OAuth 2.0 PKCE authorization, caches the token
//! - [`create`] - parse a song list, create a playlist and fill it
//! - [`preview`] - show what each song would match, optionally create the
//!   playlist from those matches afterwards
//!
//! ## Usage
//!
//! ```bash
//! spotlist auth
//! spotlist create Bollywood_Party_Playlist.txt
//! spotlist create songs.txt "My Awesome Playlist" --private
//! pbpaste | spotlist create --manual --name "Road Trip"
//! spotlist preview songs.txt --create
//! ```
//!
//! [`Worker`]: crate::worker::Worker

mod auth;
mod create;
mod input;
mod preview;
mod progress;

pub use auth::auth;
pub use create::create;
pub use input::{RunOptions, load_songs, resolve_playlist_name};
pub use preview::preview;
