//! Progress events emitted while a run is in flight.
//!
//! The pipeline never writes to the terminal. It reports what it is doing as
//! [`PipelineEvent`]s into an [`EventSink`], and the caller decides how to
//! show them. Every event renders to a single human-readable line through
//! its `Display` implementation.

use std::{fmt, sync::Mutex, time::Duration};

use tokio::sync::mpsc::UnboundedSender;

use crate::{spotify::SpotifyError, types::SongRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    LoggedIn {
        display_name: String,
    },
    PlaylistCreated {
        name: String,
        url: String,
    },
    /// A search for the request at `index` (zero-based) is starting.
    Searching {
        index: usize,
        total: usize,
        request: SongRequest,
    },
    Found {
        request: SongRequest,
        track_name: String,
        artist_name: String,
        uri: String,
    },
    NotFound {
        request: SongRequest,
    },
    SearchFailed {
        request: SongRequest,
        error: SpotifyError,
    },
    RateLimited {
        retry_after: u64,
    },
    Retrying {
        attempt: u32,
        max_attempts: u32,
        delay: Duration,
        error: SpotifyError,
    },
    BatchAdded {
        size: usize,
    },
    BatchFailed {
        size: usize,
        error: SpotifyError,
    },
}

impl PipelineEvent {
    pub fn level(&self) -> Level {
        match self {
            PipelineEvent::LoggedIn { .. } | PipelineEvent::Searching { .. } => Level::Info,
            PipelineEvent::PlaylistCreated { .. }
            | PipelineEvent::Found { .. }
            | PipelineEvent::BatchAdded { .. } => Level::Success,
            PipelineEvent::NotFound { .. }
            | PipelineEvent::SearchFailed { .. }
            | PipelineEvent::RateLimited { .. }
            | PipelineEvent::Retrying { .. }
            | PipelineEvent::BatchFailed { .. } => Level::Warning,
        }
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::LoggedIn { display_name } => write!(f, "Logged in as: {}", display_name),
            PipelineEvent::PlaylistCreated { name, url } => {
                write!(f, "Created playlist: {} ({})", name, url)
            }
            PipelineEvent::Searching { request, .. } => write!(f, "Searching for: {}", request),
            PipelineEvent::Found {
                track_name,
                artist_name,
                ..
            } => write!(f, "✓ Found: {} by {}", track_name, artist_name),
            PipelineEvent::NotFound { request } => write!(f, "✗ Not found: {}", request.title),
            PipelineEvent::SearchFailed { request, error } => {
                write!(f, "Error searching for {}: {}", request.title, error)
            }
            PipelineEvent::RateLimited { retry_after } => {
                write!(f, "Rate limited. Sleeping for {} seconds...", retry_after)
            }
            PipelineEvent::Retrying {
                attempt,
                max_attempts,
                delay,
                error,
            } => write!(
                f,
                "Search error (attempt {}/{}): {}. Retrying in {:.1}s...",
                attempt,
                max_attempts,
                error,
                delay.as_secs_f64()
            ),
            PipelineEvent::BatchAdded { size } => {
                write!(f, "Added batch of {} tracks to playlist", size)
            }
            PipelineEvent::BatchFailed { error, .. } => {
                write!(f, "Error adding batch to playlist: {}", error)
            }
        }
    }
}

/// Receiver of pipeline events.
pub trait EventSink: Send + Sync {
    /// Delivers one event. Must not block and must not fail the run.
    fn emit(&self, event: PipelineEvent);
}

impl EventSink for UnboundedSender<PipelineEvent> {
    fn emit(&self, event: PipelineEvent) {
        // the receiver going away must not stop the run
        let _ = self.send(event);
    }
}

/// Adapts a line callback, e.g. something appending to a text view.
pub struct LineSink<F>(pub F);

impl<F> EventSink for LineSink<F>
where
    F: Fn(String) + Send + Sync,
{
    fn emit(&self, event: PipelineEvent) {
        (self.0)(event.to_string())
    }
}

/// Keeps every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event received so far, in emission order.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// The received events rendered as display lines.
    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: PipelineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
