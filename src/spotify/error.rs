use reqwest::{
    Response, StatusCode,
    header::{HeaderMap, RETRY_AFTER},
};
use thiserror::Error;

/// Errors returned by the catalog and playlist service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpotifyError {
    /// HTTP 429. Recoverable by waiting `retry_after` seconds.
    #[error("rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },
    /// Network failures, timeouts and 5xx responses. Recoverable by retrying.
    #[error("transient error: {0}")]
    Transient(String),
    /// The service rejected the request; retrying will not help.
    #[error("request failed: {0}")]
    Fatal(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl SpotifyError {
    /// Whether a bounded retry with backoff may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SpotifyError::Transient(_) | SpotifyError::Decode(_))
    }

    /// Maps an unsuccessful HTTP status to an error.
    pub fn from_status(status: StatusCode, headers: &HeaderMap, body: &str) -> Self {
        let detail = if body.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {body}")
        };

        match status {
            StatusCode::TOO_MANY_REQUESTS => SpotifyError::RateLimited {
                retry_after: retry_after_secs(headers),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SpotifyError::Auth(detail),
            StatusCode::REQUEST_TIMEOUT => SpotifyError::Transient(detail),
            s if s.is_server_error() => SpotifyError::Transient(detail),
            _ => SpotifyError::Fatal(detail),
        }
    }
}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SpotifyError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SpotifyError::from_status(status, &HeaderMap::new(), "")
        } else {
            SpotifyError::Transient(err.to_string())
        }
    }
}

/// Reads the `Retry-After` header in seconds, defaulting to 1.
pub fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

/// Turns a non-success response into a [`SpotifyError`], passing successful
/// responses through.
pub async fn check_response(response: Response) -> Result<Response, SpotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();
    Err(SpotifyError::from_status(status, &headers, &body))
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn test_rate_limit_reads_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        let err = SpotifyError::from_status(StatusCode::TOO_MANY_REQUESTS, &headers, "");
        assert_eq!(err, SpotifyError::RateLimited { retry_after: 7 });
    }

    #[test]
    fn test_rate_limit_defaults_to_one_second() {
        let err =
            SpotifyError::from_status(StatusCode::TOO_MANY_REQUESTS, &HeaderMap::new(), "");
        assert_eq!(err, SpotifyError::RateLimited { retry_after: 1 });

        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(retry_after_secs(&headers), 1);
    }

    #[test]
    fn test_status_classification() {
        let h = HeaderMap::new();
        assert!(SpotifyError::from_status(StatusCode::BAD_GATEWAY, &h, "").is_retryable());
        assert!(SpotifyError::from_status(StatusCode::REQUEST_TIMEOUT, &h, "").is_retryable());
        assert!(matches!(
            SpotifyError::from_status(StatusCode::UNAUTHORIZED, &h, ""),
            SpotifyError::Auth(_)
        ));
        let bad = SpotifyError::from_status(StatusCode::BAD_REQUEST, &h, "invalid query");
        assert!(!bad.is_retryable());
        assert_eq!(
            bad,
            SpotifyError::Fatal("400 Bad Request: invalid query".to_string())
        );
    }
}
