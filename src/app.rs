//! Application state: a two-route navigation stack and key handling.
//!
//! The results route owns its search controller and view state. Leaving the
//! route drops both, which also stops any simulated download it started.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::config::Settings;
use crate::github_client::RepositorySearch;
use crate::results::ResultsView;
use crate::search::{SearchController, SearchOutcome};

/// Whether the event loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Back,
    Search,
    Quit,
}

pub struct ResultsScreen<S> {
    controller: SearchController<S>,
    view: ResultsView,
    /// Text in the query box; may run ahead of the controller's query
    /// while a debounced edit is pending.
    input: String,
    pending_since: Option<Instant>,
}

impl<S: RepositorySearch + 'static> ResultsScreen<S> {
    fn new(mut controller: SearchController<S>, query: String) -> Self {
        controller.set_query(query.clone());
        Self {
            controller,
            view: ResultsView::default(),
            input: query,
            pending_since: None,
        }
    }

    pub fn controller(&self) -> &SearchController<S> {
        &self.controller
    }

    pub fn view(&self) -> &ResultsView {
        &self.view
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn has_pending_edit(&self) -> bool {
        self.pending_since.is_some()
    }

    fn apply(&mut self, outcome: SearchOutcome) {
        if self.controller.apply(outcome) {
            self.view.clamp_cursor(self.controller.results().len());
        }
    }

    fn edit(&mut self, change: impl FnOnce(&mut String), now: Instant, settings: &Settings) {
        change(&mut self.input);
        self.pending_since = Some(now);
        self.flush(now, settings);
    }

    /// Hand a settled edit to the controller once the debounce has passed.
    fn flush(&mut self, now: Instant, settings: &Settings) {
        let Some(since) = self.pending_since else {
            return;
        };
        if now.saturating_duration_since(since) < settings.debounce {
            return;
        }

        self.pending_since = None;
        if self.input != self.controller.query() {
            self.controller.set_query(self.input.clone());
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant, settings: &Settings) -> Action {
        if let Some(expanded) = self.view.expanded_mut() {
            match key.code {
                KeyCode::Enter | KeyCode::Char('d') => {
                    expanded.start_download(settings.tick);
                }
                KeyCode::Esc | KeyCode::Char('x') => self.view.close(),
                _ => {}
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Esc => return Action::Back,
            KeyCode::Up => self.view.move_up(),
            KeyCode::Down => self.view.move_down(self.controller.results().len()),
            KeyCode::Enter => {
                if !self.controller.is_loading() {
                    self.view.select_cursor(self.controller.results());
                }
            }
            KeyCode::Backspace => self.edit(
                |input| {
                    input.pop();
                },
                now,
                settings,
            ),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit(|input| input.push(c), now, settings)
            }
            _ => {}
        }
        Action::None
    }
}

pub enum Route<S> {
    SearchEntry,
    Results(ResultsScreen<S>),
}

pub struct App<S> {
    backend: Arc<S>,
    outcomes: UnboundedSender<SearchOutcome>,
    settings: Settings,
    entry_input: String,
    routes: Vec<Route<S>>,
    throbber: ThrobberState,
}

impl<S: RepositorySearch + 'static> App<S> {
    /// Start on the search entry screen, or directly on the results for
    /// `initial_query` when it is not blank. In the latter case there is no
    /// screen to go back to.
    pub fn new(
        backend: Arc<S>,
        outcomes: UnboundedSender<SearchOutcome>,
        settings: Settings,
        initial_query: Option<String>,
    ) -> Self {
        let mut app = Self {
            backend,
            outcomes,
            settings,
            entry_input: String::new(),
            routes: Vec::new(),
            throbber: ThrobberState::default(),
        };

        match initial_query.filter(|q| !q.trim().is_empty()) {
            Some(query) => {
                let screen = app.results_screen_for(query);
                app.routes.push(Route::Results(screen));
            }
            None => app.routes.push(Route::SearchEntry),
        }
        app
    }

    fn results_screen_for(&self, query: String) -> ResultsScreen<S> {
        let controller = SearchController::new(Arc::clone(&self.backend), self.outcomes.clone());
        ResultsScreen::new(controller, query)
    }

    pub fn route(&self) -> &Route<S> {
        // Never empty: back navigation keeps the root route.
        &self.routes[self.routes.len() - 1]
    }

    pub fn results(&self) -> Option<&ResultsScreen<S>> {
        match self.route() {
            Route::Results(screen) => Some(screen),
            Route::SearchEntry => None,
        }
    }

    pub fn entry_input(&self) -> &str {
        &self.entry_input
    }

    pub fn throbber(&self) -> &ThrobberState {
        &self.throbber
    }

    pub fn can_go_back(&self) -> bool {
        self.routes.len() > 1
    }

    /// Pop the current route. No-op when there is nothing to return to.
    pub fn go_back(&mut self) -> bool {
        if !self.can_go_back() {
            debug!("Back pressed without a previous screen");
            return false;
        }
        self.routes.pop();
        true
    }

    /// Open the results screen for the entry text, unless it is blank.
    pub fn submit_search(&mut self) -> bool {
        if self.entry_input.trim().is_empty() {
            return false;
        }
        let screen = self.results_screen_for(self.entry_input.clone());
        self.routes.push(Route::Results(screen));
        true
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        let action = match self.routes.last_mut() {
            Some(Route::Results(screen)) => screen.handle_key(key, now, &self.settings),
            Some(Route::SearchEntry) | None => match key.code {
                KeyCode::Esc => Action::Quit,
                KeyCode::Enter => Action::Search,
                KeyCode::Backspace => {
                    self.entry_input.pop();
                    Action::None
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.entry_input.push(c);
                    Action::None
                }
                _ => Action::None,
            },
        };

        match action {
            Action::Quit => return Control::Quit,
            Action::Back => {
                self.go_back();
            }
            Action::Search => {
                self.submit_search();
            }
            Action::None => {}
        }
        Control::Continue
    }

    /// Route a settled fetch to the results screen that is still showing.
    pub fn apply_outcome(&mut self, outcome: SearchOutcome) {
        match self.routes.last_mut() {
            Some(Route::Results(screen)) => screen.apply(outcome),
            _ => debug!(
                "Dropping results for '{}': results screen is gone",
                outcome.query
            ),
        }
    }

    /// Periodic housekeeping: spinner animation and debounced searches.
    pub fn on_frame(&mut self, now: Instant) {
        self.throbber.calc_next();
        if let Some(Route::Results(screen)) = self.routes.last_mut() {
            screen.flush(now, &self.settings);
        }
    }
}
