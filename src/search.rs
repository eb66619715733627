//! Search controller: owns the query, the result list and the loading flag.
//!
//! Fetches run as spawned tasks and report back over a channel. The owner of
//! the controller feeds those outcomes to [`SearchController::apply`], which
//! is the only place results and loading change after a search starts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};

use crate::error::SearchError;
use crate::github_client::RepositorySearch;
use crate::model::RepositorySummary;

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Result of one fetch, tagged with the search that started it.
#[derive(Debug)]
pub struct SearchOutcome {
    pub session: u64,
    pub generation: u64,
    pub query: String,
    pub result: Result<Vec<RepositorySummary>, SearchError>,
}

pub struct SearchController<S> {
    backend: Arc<S>,
    outcomes: UnboundedSender<SearchOutcome>,
    /// Distinguishes controllers sharing one outcome channel.
    session: u64,
    /// Bumped on every query change; only the latest is applied.
    generation: u64,
    query: String,
    results: Vec<RepositorySummary>,
    loading: bool,
}

impl<S: RepositorySearch + 'static> SearchController<S> {
    pub fn new(backend: Arc<S>, outcomes: UnboundedSender<SearchOutcome>) -> Self {
        Self {
            backend,
            outcomes,
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            query: String::new(),
            results: Vec::new(),
            loading: false,
        }
    }

    /// Store the query and start searching for it.
    ///
    /// A blank query clears the results without touching the network. Any
    /// fetch still in flight is superseded either way.
    pub fn set_query(&mut self, text: impl Into<String>) -> &str {
        self.query = text.into();
        self.generation += 1;

        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            self.results.clear();
            self.loading = false;
            return &self.query;
        }

        self.loading = true;

        let backend = Arc::clone(&self.backend);
        let outcomes = self.outcomes.clone();
        let session = self.session;
        let generation = self.generation;
        let query = self.query.clone();
        debug!("Starting search #{} for '{}'", generation, query);

        tokio::spawn(async move {
            let result = backend.search(&query).await;
            let outcome = SearchOutcome {
                session,
                generation,
                query,
                result,
            };
            if outcomes.send(outcome).is_err() {
                debug!("Search #{} settled after its receiver closed", generation);
            }
        });

        &self.query
    }

    /// Apply a settled fetch. Returns `false` when the outcome belongs to a
    /// superseded search and was dropped.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.session != self.session || outcome.generation != self.generation {
            debug!(
                "Discarding stale results for '{}' (search #{}, current #{})",
                outcome.query, outcome.generation, self.generation
            );
            return false;
        }

        self.results = match outcome.result {
            Ok(items) => {
                info!("Found {} repositories for '{}'", items.len(), outcome.query);
                items
            }
            Err(err) => {
                error!("Search for '{}' failed: {}", outcome.query, err);
                Vec::new()
            }
        };
        self.loading = false;
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[RepositorySummary] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
