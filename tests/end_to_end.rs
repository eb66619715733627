use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use repo_downloader_lib::ui::{draw_at, NO_RESULTS_TEXT};
use repo_downloader_lib::{
    App, RepositorySearch, RepositorySummary, SearchError, SearchOutcome, Settings,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Answers "react" with three repositories and everything else with nothing.
#[derive(Default)]
struct ReactSearch {
    calls: AtomicUsize,
}

impl RepositorySearch for ReactSearch {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<RepositorySummary>, SearchError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let items = if query == "react" {
            vec![
                RepositorySummary::new(10270250, "react")
                    .with_description("The library for web and native user interfaces."),
                RepositorySummary::new(29028775, "react-native")
                    .with_description("A framework for building native applications using React")
                    .with_language("C++")
                    .with_stars(118_400)
                    .with_updated_at("2026-10-13T12:00:00Z"),
                RepositorySummary::new(57620511, "react-router")
                    .with_description("Declarative routing for React"),
            ]
        } else {
            Vec::new()
        };
        async move { Ok(items) }
    }
}

fn render(app: &App<ReactSearch>) -> Vec<String> {
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| draw_at(frame, app, now)).unwrap();

    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

fn row_of(lines: &[String], needle: &str) -> Option<usize> {
    lines.iter().position(|line| line.contains(needle))
}

fn press(app: &mut App<ReactSearch>, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
}

async fn settle(app: &mut App<ReactSearch>, rx: &mut UnboundedReceiver<SearchOutcome>) {
    let outcome = rx.recv().await.expect("search outcome");
    app.apply_outcome(outcome);
}

#[tokio::test]
async fn react_search_select_second_and_close() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let backend = Arc::new(ReactSearch::default());
    let mut app = App::new(Arc::clone(&backend), tx, Settings::default(), None);

    for c in "react".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Enter);
    settle(&mut app, &mut rx).await;

    let lines = render(&app);
    let first = row_of(&lines, "The library for web").expect("first row");
    let second = row_of(&lines, "A framework for building native").expect("second row");
    let third = row_of(&lines, "Declarative routing").expect("third row");
    assert!(first < second && second < third);
    assert!(lines.iter().any(|l| l.contains("3 repositories")));

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    let detail = render(&app).join("\n");
    assert!(detail.contains(" react-native "));
    assert!(detail.contains("● C++   ★ 118.4K   updated 3 days ago"));
    assert!(detail.contains("[ Download (0%) ]"));

    press(&mut app, KeyCode::Esc);
    let closed = render(&app).join("\n");
    assert!(!closed.contains("Download ("));
    assert!(closed.contains("Declarative routing"));
    assert!(app.results().unwrap().view().expanded().is_none());
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unmatched_query_shows_empty_state() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(
        Arc::new(ReactSearch::default()),
        tx,
        Settings::default(),
        Some("no-such-thing".to_string()),
    );
    settle(&mut app, &mut rx).await;

    assert!(render(&app).join("\n").contains(NO_RESULTS_TEXT));
}
