use chrono::Utc;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use std::future::Future;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::SearchError;
use crate::model::{RepositorySummary, SearchResponse};

const SEARCH_PATH: &str = "search/repositories";
const USER_AGENT: &str = concat!("repo-downloader/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// Anything that can answer a free-text repository search.
///
/// The search controller only talks to this trait, so tests can drive it
/// with a canned backend instead of the network.
pub trait RepositorySearch: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<RepositorySummary>, SearchError>> + Send;
}

/// Client for the GitHub repository search endpoint.
pub struct GitHubClient {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a new GitHubClient from resolved settings
    pub fn new(settings: &Settings) -> Result<Self, SearchError> {
        let endpoint = search_endpoint(&settings.api_url)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()?;

        Ok(GitHubClient {
            client,
            endpoint,
            token: settings.token.clone(),
        })
    }

    /// Full request URL for a query, with the query URL-encoded.
    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }

    /// Run one search request and decode its items.
    pub async fn search_repositories(
        &self,
        query: &str,
    ) -> Result<Vec<RepositorySummary>, SearchError> {
        let url = self.search_url(query);
        debug!("Requesting URL: {}", url);

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;

        if let Some(rate_limit) = RateLimit::from_headers(response.headers()) {
            rate_limit.log(Utc::now().timestamp());
        }

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&body)?;
        let items = parsed.into_items();
        debug!("Decoded {} repositories for '{}'", items.len(), query);
        Ok(items)
    }
}

impl RepositorySearch for GitHubClient {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<RepositorySummary>, SearchError>> + Send {
        self.search_repositories(query)
    }
}

fn search_endpoint(api_url: &str) -> Result<Url, SearchError> {
    let raw = format!("{}/{}", api_url.trim_end_matches('/'), SEARCH_PATH);
    Url::parse(&raw).map_err(|source| SearchError::InvalidUrl { url: raw, source })
}

/// GitHub rate limit headers of one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub remaining: u32,
    pub limit: u32,
    /// Unix timestamp at which the window resets.
    pub reset: Option<u64>,
}

impl RateLimit {
    /// Read `X-RateLimit-*` headers. `None` when either count is missing or
    /// unparsable.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let number = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
        };

        let remaining = u32::try_from(number("X-RateLimit-Remaining")?).ok()?;
        let limit = u32::try_from(number("X-RateLimit-Limit")?).ok()?;

        Some(RateLimit {
            remaining,
            limit,
            reset: number("X-RateLimit-Reset"),
        })
    }

    /// Percentage of the window still available.
    pub fn percent_remaining(&self) -> u32 {
        if self.limit > 0 {
            ((u64::from(self.remaining) * 100) / u64::from(self.limit)) as u32
        } else {
            100
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Seconds until the window resets, measured from `now` (unix seconds).
    pub fn seconds_until_reset(&self, now: i64) -> Option<u64> {
        let reset = self.reset?;
        let now = u64::try_from(now).ok()?;
        (reset > now).then(|| reset - now)
    }

    fn log(&self, now: i64) {
        debug!(
            "Rate limit: {}/{} ({}%)",
            self.remaining,
            self.limit,
            self.percent_remaining()
        );

        if self.is_exhausted() {
            match self.seconds_until_reset(now) {
                Some(wait_secs) => warn!(
                    "Rate limit reached. Searches fail for the next {} seconds",
                    wait_secs + 1
                ),
                None => warn!("Rate limit reached"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn client(api_url: &str) -> GitHubClient {
        GitHubClient::new(&Settings {
            api_url: api_url.to_string(),
            ..Settings::default()
        })
        .unwrap()
    }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn query_is_url_encoded() {
        let url = client("https://api.github.com").search_url("rust lang&stars:>10");
        assert_eq!(url.path(), "/search/repositories");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("q".to_string(), "rust lang&stars:>10".to_string())]
        );
        assert!(!url.as_str().contains(' '));
        assert!(url.as_str().contains("%26"));
    }

    #[test]
    fn trailing_slash_on_api_url_is_tolerated() {
        let url = client("http://localhost:8080/api/").search_url("x");
        assert_eq!(url.as_str(), "http://localhost:8080/api/search/repositories?q=x");
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let result = GitHubClient::new(&Settings {
            api_url: "not a url".to_string(),
            ..Settings::default()
        });
        assert!(matches!(result, Err(SearchError::InvalidUrl { .. })));
    }

    #[test]
    fn rate_limit_parses_headers() {
        let limit = RateLimit::from_headers(&headers(&[
            ("X-RateLimit-Remaining", "3"),
            ("X-RateLimit-Limit", "10"),
            ("X-RateLimit-Reset", "1700000060"),
        ]))
        .unwrap();

        assert_eq!(limit.percent_remaining(), 30);
        assert!(!limit.is_exhausted());
        assert_eq!(limit.seconds_until_reset(1_700_000_000), Some(60));
        assert_eq!(limit.seconds_until_reset(1_700_000_100), None);
    }

    #[test]
    fn rate_limit_needs_both_counts() {
        assert_eq!(
            RateLimit::from_headers(&headers(&[("X-RateLimit-Remaining", "0")])),
            None
        );
        assert_eq!(
            RateLimit::from_headers(&headers(&[
                ("X-RateLimit-Remaining", "many"),
                ("X-RateLimit-Limit", "10"),
            ])),
            None
        );
    }

    #[test]
    fn zero_limit_counts_as_full() {
        let limit = RateLimit {
            remaining: 0,
            limit: 0,
            reset: None,
        };
        assert_eq!(limit.percent_remaining(), 100);
        assert!(limit.is_exhausted());
    }
}
