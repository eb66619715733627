//! View state of the results screen: the row cursor and the (single)
//! expanded item with its simulated download.

use chrono::{DateTime, Utc};
use tokio::time::Duration;
use tracing::info;

use crate::format::{star_label, updated_label};
use crate::model::RepositorySummary;
use crate::progress::{DownloadTask, ProgressState};

/// One list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
}

/// What the body of the results screen shows.
#[derive(Debug, PartialEq, Eq)]
pub enum ResultsBody<'a> {
    Loading,
    Empty,
    List(Vec<ResultRow<'a>>),
}

impl<'a> ResultsBody<'a> {
    pub fn new(results: &'a [RepositorySummary], loading: bool) -> Self {
        if loading {
            ResultsBody::Loading
        } else if results.is_empty() {
            ResultsBody::Empty
        } else {
            ResultsBody::List(
                results
                    .iter()
                    .map(|repo| ResultRow {
                        name: &repo.name,
                        description: repo.description.as_deref().filter(|d| !d.is_empty()),
                    })
                    .collect(),
            )
        }
    }
}

/// Formatted fields of the detail view, computed at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub name: String,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: Option<String>,
    pub updated: Option<String>,
    pub url: Option<String>,
}

impl DetailFields {
    pub fn new(repo: &RepositorySummary, now: DateTime<Utc>) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        Self {
            name: repo.name.clone(),
            full_name: non_empty(&repo.full_name),
            description: non_empty(&repo.description),
            language: non_empty(&repo.language),
            stars: star_label(repo.stars),
            updated: updated_label(repo.updated_at.as_deref(), now),
            url: non_empty(&repo.html_url),
        }
    }
}

/// The repository shown in the detail overlay.
#[derive(Debug)]
pub struct ExpandedItem {
    repo: RepositorySummary,
    download: Option<DownloadTask>,
}

impl ExpandedItem {
    fn new(repo: RepositorySummary) -> Self {
        Self {
            repo,
            download: None,
        }
    }

    pub fn repo(&self) -> &RepositorySummary {
        &self.repo
    }

    pub fn progress(&self) -> ProgressState {
        self.download
            .as_ref()
            .map(DownloadTask::state)
            .unwrap_or_default()
    }

    pub fn download(&self) -> Option<&DownloadTask> {
        self.download.as_ref()
    }

    /// Start (or restart) the simulated download. The previous run, if any,
    /// is stopped first.
    pub fn start_download(&mut self, tick: Duration) -> u8 {
        let name = self.repo.name.clone();
        let mut started = 0;
        let task = DownloadTask::spawn(tick, |percent| {
            info!("Download progress for '{}': {}%", name, percent);
            started = percent;
        });
        self.download = Some(task);
        started
    }
}

#[derive(Debug, Default)]
pub struct ResultsView {
    cursor: usize,
    expanded: Option<ExpandedItem>,
}

impl ResultsView {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// Keep the cursor inside a freshly replaced result list.
    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Expand `results[index]`, replacing whatever was expanded before.
    pub fn select(&mut self, results: &[RepositorySummary], index: usize) -> bool {
        let Some(repo) = results.get(index) else {
            return false;
        };
        self.cursor = index;
        self.expanded = Some(ExpandedItem::new(repo.clone()));
        true
    }

    pub fn select_cursor(&mut self, results: &[RepositorySummary]) -> bool {
        self.select(results, self.cursor)
    }

    /// Close the detail view. Drops its download, which stops the timer.
    pub fn close(&mut self) {
        self.expanded = None;
    }

    pub fn expanded(&self) -> Option<&ExpandedItem> {
        self.expanded.as_ref()
    }

    pub fn expanded_mut(&mut self) -> Option<&mut ExpandedItem> {
        self.expanded.as_mut()
    }
}
