//! Error types.
//!
//! The UI recognises a single runtime failure, "fetch failed". [`SearchError`]
//! keeps the underlying cause so it can be logged; callers of the search
//! controller never see it beyond an empty result list.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a repository search did not produce a result list.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The configured API base URL cannot be turned into a search URL.
    #[error("invalid search endpoint {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport failure: DNS, TLS, connection reset, timeout.
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("search endpoint returned {0}")]
    Status(StatusCode),

    /// The body was not a search response.
    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// Whether the failure is worth a retry by the user (rate limiting and
    /// server-side errors), as opposed to a malformed request.
    pub fn is_transient(&self) -> bool {
        match self {
            SearchError::Request(_) => true,
            SearchError::Status(status) => {
                status.is_server_error()
                    || *status == StatusCode::FORBIDDEN
                    || *status == StatusCode::TOO_MANY_REQUESTS
            }
            SearchError::InvalidUrl { .. } | SearchError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_render_the_code() {
        let err = SearchError::Status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.to_string(),
            "search endpoint returned 422 Unprocessable Entity"
        );
        assert!(!err.is_transient());
    }

    #[test]
    fn rate_limit_statuses_are_transient() {
        assert!(SearchError::Status(StatusCode::FORBIDDEN).is_transient());
        assert!(SearchError::Status(StatusCode::BAD_GATEWAY).is_transient());
    }

    #[test]
    fn decode_errors_are_not_transient() {
        let err: SearchError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, SearchError::Decode(_)));
        assert!(!err.is_transient());
    }
}
