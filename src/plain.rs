//! Non-interactive mode: search once, print the rows, optionally simulate a
//! download with a progress bar.

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::info;

use crate::config::Settings;
use crate::github_client::RepositorySearch;
use crate::progress::DownloadTask;
use crate::results::{DetailFields, ResultsBody, ResultsView};
use crate::search::SearchController;
use crate::ui::{download_label, NO_RESULTS_TEXT};

/// Run the search for `query`, print results to `out` and, when `download`
/// names a 1-based row, simulate downloading it.
pub async fn run<S: RepositorySearch + 'static>(
    backend: Arc<S>,
    settings: &Settings,
    query: &str,
    download: Option<usize>,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = SearchController::new(backend, tx);
    controller.set_query(query);

    if controller.is_loading() {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {wide_msg}")?
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        spinner.set_message(format!("Searching for '{}'", query.trim()));
        spinner.enable_steady_tick(Duration::from_millis(80));

        while controller.is_loading() {
            match rx.recv().await {
                Some(outcome) => {
                    controller.apply(outcome);
                }
                None => break,
            }
        }
        spinner.finish_and_clear();
    }

    let results = controller.results();
    match ResultsBody::new(results, controller.is_loading()) {
        ResultsBody::List(_) => write_results(out, results)?,
        ResultsBody::Empty | ResultsBody::Loading => writeln!(out, "{}", NO_RESULTS_TEXT)?,
    }

    let Some(row) = download else {
        return Ok(());
    };

    let mut view = ResultsView::default();
    let selected = row
        .checked_sub(1)
        .is_some_and(|index| view.select(results, index));
    if !selected {
        return Err(format!("no result row {} to download", row).into());
    }

    if let Some(expanded) = view.expanded_mut() {
        expanded.start_download(settings.tick);
        if let Some(task) = expanded.download() {
            let name = expanded.repo().name.clone();
            show_progress(task, &name).await;
            writeln!(out, "{}: {}", name, download_label(task.state()))?;
        }
    }
    Ok(())
}

fn write_results(
    out: &mut impl Write,
    results: &[crate::model::RepositorySummary],
) -> io::Result<()> {
    let now = Utc::now();
    for (index, repo) in results.iter().enumerate() {
        let fields = DetailFields::new(repo, now);
        let title = fields.full_name.as_deref().unwrap_or(&fields.name);
        writeln!(out, "{:>3}. {}", index + 1, title)?;
        if let Some(description) = &fields.description {
            writeln!(out, "     {}", description)?;
        }

        let details: Vec<String> = [
            fields.language.map(|l| format!("● {}", l)),
            fields.stars.map(|s| format!("★ {}", s)),
            fields.updated.map(|u| format!("updated {}", u)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !details.is_empty() {
            writeln!(out, "     {}", details.join("   "))?;
        }
    }
    Ok(())
}

async fn show_progress(task: &DownloadTask, name: &str) {
    let bar = ProgressBar::new(100);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {wide_msg}")
    {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar.set_message(format!("Downloading {}", name));

    let mut rx = task.subscribe();
    bar.set_position(u64::from(rx.borrow_and_update().percent()));
    while rx.changed().await.is_ok() {
        let state = *rx.borrow_and_update();
        bar.set_position(u64::from(state.percent()));
        if state.is_complete() {
            break;
        }
    }

    info!("Simulated download of '{}' finished", name);
    bar.finish_with_message(format!("Downloaded {}", name));
}
