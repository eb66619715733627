//! Terminal event loop.
//!
//! A single task owns the [`App`]: key presses, settled searches and frame
//! ticks are multiplexed with `tokio::select!`, so no UI state is shared.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::info;

use crate::app::{App, Control};
use crate::config::Settings;
use crate::github_client::RepositorySearch;
use crate::search::SearchOutcome;
use crate::ui;

/// Redraw cadence; drives the spinner, progress bar and debounce.
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Run the interactive UI until the user quits.
pub async fn run<S: RepositorySearch + 'static>(
    backend: Arc<S>,
    settings: Settings,
    initial_query: Option<String>,
) -> Result<(), TuiError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(backend, tx, settings, initial_query);

    let mut terminal = ratatui::init();
    info!("Interactive UI started");
    let result = event_loop(&mut terminal, &mut app, &mut rx).await;
    ratatui::restore();
    info!("Interactive UI stopped");
    result
}

async fn event_loop<S: RepositorySearch + 'static>(
    terminal: &mut DefaultTerminal,
    app: &mut App<S>,
    outcomes: &mut UnboundedReceiver<SearchOutcome>,
) -> Result<(), TuiError> {
    let mut events = EventStream::new();
    let mut frames = time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key, Instant::now()) == Control::Quit {
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(()),
            },
            Some(outcome) = outcomes.recv() => app.apply_outcome(outcome),
            _ = frames.tick() => app.on_frame(Instant::now()),
        }
    }
}
