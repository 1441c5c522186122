//! Match-and-populate pipeline.
//!
//! A run searches every song request in input order, takes the first result of
//! each scoped query as its match, then submits the unique track URIs to the
//! playlist in batches of at most [`MAX_BATCH_SIZE`]. Failures of individual
//! searches or batches are reported through the event sink and never stop the
//! run.

use std::sync::Arc;

use crate::{
    events::{EventSink, PipelineEvent},
    retry::{RetryPolicy, search_with_retry},
    spotify::{CatalogService, MAX_BATCH_SIZE, SEARCH_LIMIT, SpotifyError, search},
    types::{
        CreatePlaylistRequest, CurrentUser, MatchReport, MatchResult, PipelineOutcome,
        PlaylistHandle, SongRequest,
    },
    utils,
};

/// Splits identifiers into consecutive batches the add-items call accepts.
pub fn batches(ids: &[String]) -> std::slice::Chunks<'_, String> {
    ids.chunks(MAX_BATCH_SIZE)
}

/// One match-and-populate run against a catalog.
///
/// # Example
///
/// ```
/// let sink: Arc<dyn EventSink> = Arc::new(RecordingSink::new());
/// let pipeline = Pipeline::new(Arc::new(client), sink);
/// let (_, playlist) = pipeline.create_playlist("Road Trip", true, "manual entries").await?;
/// let outcome = pipeline.run(&playlist, &songs).await;
/// ```
pub struct Pipeline<C: ?Sized> {
    catalog: Arc<C>,
    sink: Arc<dyn EventSink>,
    policy: RetryPolicy,
}

impl<C> Pipeline<C>
where
    C: CatalogService + ?Sized,
{
    /// Creates a pipeline reporting to `sink`, using the default retry policy
    /// of three attempts with a one second base backoff.
    pub fn new(catalog: Arc<C>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            catalog,
            sink,
            policy: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy used for searches.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Looks up the current user and creates the playlist a run fills.
    ///
    /// # Errors
    ///
    /// Any failure here aborts the run before the first search.
    pub async fn create_playlist(
        &self,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<(CurrentUser, PlaylistHandle), SpotifyError> {
        let user = self.catalog.current_user().await?;
        self.sink.emit(PipelineEvent::LoggedIn {
            display_name: user.display_name.clone().unwrap_or_else(|| user.id.clone()),
        });

        let request = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
            collaborative: false,
        };
        let created = self.catalog.create_playlist(&user.id, &request).await?;
        let playlist = PlaylistHandle {
            id: created.id,
            external_url: created.external_urls.spotify,
        };
        self.sink.emit(PipelineEvent::PlaylistCreated {
            name: name.to_string(),
            url: playlist.external_url.clone(),
        });

        Ok((user, playlist))
    }

    /// Searches every request sequentially and sorts it into matched or
    /// unmatched, both in input order.
    pub async fn match_requests(&self, requests: &[SongRequest]) -> MatchReport {
        let mut report = MatchReport::default();
        let total = requests.len();

        for (index, request) in requests.iter().enumerate() {
            self.sink.emit(PipelineEvent::Searching {
                index,
                total,
                request: request.clone(),
            });

            let query = search::scoped_query(request);
            let result = search_with_retry(
                self.catalog.as_ref(),
                &query,
                SEARCH_LIMIT,
                &self.policy,
                self.sink.as_ref(),
            )
            .await;

            match result {
                Ok(tracks) => match tracks.into_iter().next() {
                    Some(track) => {
                        self.sink.emit(PipelineEvent::Found {
                            request: request.clone(),
                            track_name: track.name.clone(),
                            artist_name: track.first_artist().to_string(),
                            uri: track.uri.clone(),
                        });
                        report.matches.push(MatchResult {
                            request: request.clone(),
                            artist_name: track.first_artist().to_string(),
                            track_id: track.uri,
                            track_name: track.name,
                        });
                    }
                    None => {
                        self.sink.emit(PipelineEvent::NotFound {
                            request: request.clone(),
                        });
                        report.unmatched.push(request.clone());
                    }
                },
                Err(error) => {
                    self.sink.emit(PipelineEvent::SearchFailed {
                        request: request.clone(),
                        error,
                    });
                    report.unmatched.push(request.clone());
                }
            }
        }

        report
    }

    /// Deduplicates `ids` and adds them to the playlist batch by batch.
    ///
    /// A failed batch is reported and the remaining batches are still sent.
    /// Returns the number of unique identifiers submitted, whether or not
    /// their batch succeeded.
    pub async fn submit(&self, playlist: &PlaylistHandle, ids: Vec<String>) -> usize {
        let unique = utils::dedup_preserving_order(ids);

        for batch in batches(&unique) {
            match self.catalog.add_items(&playlist.id, batch).await {
                Ok(()) => self
                    .sink
                    .emit(PipelineEvent::BatchAdded { size: batch.len() }),
                Err(error) => self.sink.emit(PipelineEvent::BatchFailed {
                    size: batch.len(),
                    error,
                }),
            }
        }

        unique.len()
    }

    /// Matches all requests and populates `playlist` with the results.
    pub async fn run(
        &self,
        playlist: &PlaylistHandle,
        requests: &[SongRequest],
    ) -> PipelineOutcome {
        let report = self.match_requests(requests).await;
        let added_count = self.submit(playlist, report.track_ids()).await;

        PipelineOutcome {
            added_count,
            unmatched: report.unmatched,
        }
    }
}
