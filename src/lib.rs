//! # Repo Downloader
//!
//! A terminal client for searching GitHub repositories, inspecting one of the
//! results and simulating a download of it.
//!
//! ## Main Components
//!
//! - [`SearchController`]: owns the query, the result list and the loading
//!   flag; discards results of superseded searches
//! - [`ResultsView`]: row cursor and the single expanded item
//! - [`ProgressSimulator`] / [`DownloadTask`]: synthetic, cancellable progress
//! - [`GitHubClient`]: the [`RepositorySearch`] implementation backed by the
//!   GitHub REST API
//! - [`App`]: navigation between the search entry and results screens
//!
//! ## Example
//!
//! ```no_run
//! use repo_downloader_lib::{GitHubClient, SearchController, Settings};
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let client = Arc::new(GitHubClient::new(&Settings::default())?);
//!     let (tx, mut rx) = mpsc::unbounded_channel();
//!
//!     let mut controller = SearchController::new(client, tx);
//!     controller.set_query("tokio");
//!     if let Some(outcome) = rx.recv().await {
//!         controller.apply(outcome);
//!     }
//!
//!     for repo in controller.results() {
//!         println!("{}", repo.name);
//!     }
//!     Ok(())
//! }
//! ```

mod args;
pub mod app;
pub mod config;
pub mod error;
pub mod format;
mod github_client;
pub mod logging;
pub mod model;
pub mod plain;
pub mod progress;
pub mod results;
pub mod search;
pub mod tui;
pub mod ui;

// Re-export main components for documentation and external use
pub use crate::app::{App, Control, Route};
pub use crate::args::Args;
pub use crate::config::Settings;
pub use crate::error::SearchError;
pub use crate::github_client::{GitHubClient, RateLimit, RepositorySearch};
pub use crate::model::RepositorySummary;
pub use crate::progress::{DownloadTask, ProgressSimulator, ProgressState};
pub use crate::results::{DetailFields, ResultsView};
pub use crate::search::{SearchController, SearchOutcome};
