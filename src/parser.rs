//! Song list parsing.
//!
//! Input lines look like `Song Title – Artist or Movie`. Three separators are
//! recognized and checked in a fixed priority order: en-dash, hyphen, em-dash.
//! The first separator of that list that occurs in a line wins, even if another
//! separator appears earlier in the line, and the line is split at its first
//! occurrence.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::SongRequest;

/// Separators in priority order.
pub const SEPARATORS: [char; 3] = ['\u{2013}', '-', '\u{2014}'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Lines from a song file; both title and context are required.
    File,
    /// Free text typed or pasted by the user; a line without a separator is a
    /// bare title.
    Manual,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("File '{0}' not found!")]
    NotFound(PathBuf),
    #[error("Error reading file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parses raw lines into song requests, preserving input order.
pub fn parse<I, S>(lines: I, mode: InputMode) -> Vec<SongRequest>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_line(line.as_ref(), mode))
        .collect()
}

/// Parses a multi-line block of text.
pub fn parse_text(text: &str, mode: InputMode) -> Vec<SongRequest> {
    parse(text.lines(), mode)
}

/// Parses a single line. Returns `None` for blank or dropped lines.
pub fn parse_line(line: &str, mode: InputMode) -> Option<SongRequest> {
    let raw = line.replace('\u{00A0}', " ");
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let Some((left, right)) = split_on_separator(raw) else {
        return match mode {
            InputMode::File => None,
            InputMode::Manual => Some(SongRequest::new(raw, "")),
        };
    };

    let title = strip_quotes(left);
    let context = right.trim();

    if title.is_empty() {
        return None;
    }
    if mode == InputMode::File && context.is_empty() {
        return None;
    }

    Some(SongRequest::new(title, context))
}

fn split_on_separator(raw: &str) -> Option<(&str, &str)> {
    SEPARATORS
        .iter()
        .find(|sep| raw.contains(**sep))
        .and_then(|sep| raw.split_once(*sep))
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace())
}

/// Reads and parses a song file in [`InputMode::File`].
pub async fn read_songs_from_file(path: &Path) -> Result<Vec<SongRequest>, ParseError> {
    if !path.exists() {
        return Err(ParseError::NotFound(path.to_path_buf()));
    }

    let content = async_fs::read_to_string(path)
        .await
        .map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(parse_text(&content, InputMode::File))
}

/// Default playlist name for a song file: the base name without extension,
/// underscores replaced by spaces.
pub fn default_playlist_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace('_', " "))
        .unwrap_or_default()
}
