use std::path::Path;

use spotlist::types::SongRequest;
use spotlist::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let challenge = generate_code_challenge("test_verifier_123");

    // Should be deterministic
    assert_eq!(challenge, generate_code_challenge("test_verifier_123"));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // SHA-256 digest, URL-safe base64 without padding
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_dedup_preserving_order() {
    let ids: Vec<String> = vec!["b", "a", "b", "c", "a", "d"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(dedup_preserving_order(ids), vec!["b", "a", "c", "d"]);
}

#[test]
fn test_dedup_without_duplicates_is_identity() {
    let ids: Vec<String> = (0..50).map(|i| format!("spotify:track:{i}")).collect();
    assert_eq!(dedup_preserving_order(ids.clone()), ids);
    assert!(dedup_preserving_order(Vec::<String>::new()).is_empty());
}

#[test]
fn test_playlist_description() {
    assert_eq!(
        playlist_description(Some(Path::new("songs.txt")), false),
        "Created from songs.txt"
    );
    assert_eq!(
        playlist_description(Some(Path::new("songs.txt")), true),
        "Created from songs.txt (preview)"
    );
    assert_eq!(
        playlist_description(None, false),
        "Created from manual entries"
    );
}

#[test]
fn test_song_request_display() {
    assert_eq!(
        SongRequest::new("Kesariya", "Brahmastra").to_string(),
        "Kesariya - Brahmastra"
    );
    assert_eq!(SongRequest::new("Tum Hi Ho", "").to_string(), "Tum Hi Ho");
}
