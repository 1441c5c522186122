mod common;

use std::time::Duration;

use common::{MockCatalog, fixed_policy, track};
use spotlist::{
    events::{PipelineEvent, RecordingSink},
    retry::search_with_retry,
    spotify::SpotifyError,
};
use tokio::time::Instant;

const QUERY: &str = "track:\"Kesariya\" Brahmastra";

fn transient() -> SpotifyError {
    SpotifyError::Transient("503 Service Unavailable".to_string())
}

#[tokio::test(start_paused = true)]
async fn test_success_on_first_attempt() {
    let catalog = MockCatalog::new();
    catalog.script(QUERY, vec![Ok(vec![track("1", "Kesariya", "Arijit Singh")])]);
    let sink = RecordingSink::new();

    let start = Instant::now();
    let tracks = search_with_retry(&catalog, QUERY, 5, &fixed_policy(3), &sink)
        .await
        .unwrap();

    assert_eq!(tracks.len(), 1);
    assert_eq!(catalog.search_count(), 1);
    assert!(sink.events().is_empty());
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_transient_errors_back_off_exponentially() {
    let catalog = MockCatalog::new();
    catalog.script(
        QUERY,
        vec![
            Err(transient()),
            Err(transient()),
            Ok(vec![track("1", "Kesariya", "Arijit Singh")]),
        ],
    );
    let sink = RecordingSink::new();

    let start = Instant::now();
    let tracks = search_with_retry(&catalog, QUERY, 5, &fixed_policy(3), &sink)
        .await
        .unwrap();

    assert_eq!(tracks[0].name, "Kesariya");
    assert_eq!(catalog.search_count(), 3);
    // 1s then 2s
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_millis(3100));

    let delays: Vec<(u32, Duration)> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            PipelineEvent::Retrying { attempt, delay, .. } => Some((attempt, delay)),
            _ => None,
        })
        .collect();
    assert_eq!(
        delays,
        vec![(1, Duration::from_secs(1)), (2, Duration::from_secs(2))]
    );
}

#[tokio::test(start_paused = true)]
async fn test_jitter_stays_below_one_second() {
    let catalog = MockCatalog::new();
    catalog.script(QUERY, vec![Err(transient()), Ok(Vec::new())]);
    let sink = RecordingSink::new();

    let start = Instant::now();
    search_with_retry(&catalog, QUERY, 5, &Default::default(), &sink)
        .await
        .unwrap();

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_attempts_return_last_error() {
    let catalog = MockCatalog::new();
    catalog.script(
        QUERY,
        vec![Err(transient()), Err(transient()), Err(transient())],
    );
    let sink = RecordingSink::new();

    let result = search_with_retry(&catalog, QUERY, 5, &fixed_policy(3), &sink).await;

    assert_eq!(result.unwrap_err(), transient());
    assert_eq!(catalog.search_count(), 3);
    // the final failure is not followed by a retry notice
    assert_eq!(sink.events().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_fatal_error_is_not_retried() {
    let catalog = MockCatalog::new();
    catalog.script(
        QUERY,
        vec![Err(SpotifyError::Fatal("400 Bad Request".to_string()))],
    );
    let sink = RecordingSink::new();

    let result = search_with_retry(&catalog, QUERY, 5, &fixed_policy(3), &sink).await;

    assert!(matches!(result, Err(SpotifyError::Fatal(_))));
    assert_eq!(catalog.search_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_waits_retry_after_and_retries_same_query() {
    let catalog = MockCatalog::new();
    catalog.script(
        QUERY,
        vec![
            Err(SpotifyError::RateLimited { retry_after: 2 }),
            Ok(vec![track("1", "Kesariya", "Arijit Singh")]),
        ],
    );
    let sink = RecordingSink::new();

    let start = Instant::now();
    let tracks = search_with_retry(&catalog, QUERY, 5, &fixed_policy(3), &sink)
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_secs(2));
    assert_eq!(tracks.len(), 1);
    assert_eq!(
        catalog.searches.lock().unwrap().as_slice(),
        [QUERY.to_string(), QUERY.to_string()]
    );
    assert_eq!(
        sink.lines(),
        vec!["Rate limited. Sleeping for 2 seconds...".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_rate_limits_do_not_consume_attempts() {
    let catalog = MockCatalog::new();
    let mut responses: Vec<_> = (0..5)
        .map(|_| Err(SpotifyError::RateLimited { retry_after: 1 }))
        .collect();
    responses.push(Err(transient()));
    responses.push(Ok(Vec::new()));
    catalog.script(QUERY, responses);
    let sink = RecordingSink::new();

    let result = search_with_retry(&catalog, QUERY, 5, &fixed_policy(2), &sink).await;

    assert!(result.is_ok());
    assert_eq!(catalog.search_count(), 7);
}
