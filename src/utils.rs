use std::{collections::HashSet, hash::Hash, path::Path};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Removes repeated items, keeping the first occurrence of each in place.
pub fn dedup_preserving_order<T>(items: Vec<T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Playlist description recorded for a run.
pub fn playlist_description(source: Option<&Path>, preview: bool) -> String {
    let source = source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "manual entries".to_string());
    if preview {
        format!("Created from {} (preview)", source)
    } else {
        format!("Created from {}", source)
    }
}
