//! Rendering of both screens and the detail overlay.

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::app::{App, ResultsScreen, Route};
use crate::github_client::RepositorySearch;
use crate::progress::{ProgressState, COMPLETE};
use crate::results::{DetailFields, ExpandedItem, ResultsBody};

pub const APP_TITLE: &str = "Repo Downloader";
pub const LOADING_TEXT: &str = "Getting Repos...";
pub const NO_RESULTS_TEXT: &str = "Your search did not match any repositories";
const PLACEHOLDER: &str = "Search...";
const HEADER_BG: Color = Color::Rgb(0x24, 0x29, 0x2e);
const MUTED: Color = Color::Gray;

/// Draw the current screen, formatting relative times against the wall clock.
pub fn draw<S: RepositorySearch + 'static>(frame: &mut Frame, app: &App<S>) {
    draw_at(frame, app, Utc::now());
}

/// Draw the current screen with an explicit "now".
pub fn draw_at<S: RepositorySearch + 'static>(frame: &mut Frame, app: &App<S>, now: DateTime<Utc>) {
    let area = frame.area();
    match app.route() {
        Route::SearchEntry => draw_entry(frame, area, app.entry_input()),
        Route::Results(screen) => {
            draw_results(frame, area, screen, app.throbber(), app.can_go_back());
            if let Some(expanded) = screen.view().expanded() {
                draw_detail(frame, area, expanded, now);
            }
        }
    }
}

fn header_style() -> Style {
    Style::default().bg(HEADER_BG).fg(Color::White)
}

fn query_line(input: &str) -> Line<'_> {
    if input.is_empty() {
        Line::from(Span::styled(PLACEHOLDER, Style::default().fg(MUTED)))
    } else {
        Line::from(vec![Span::raw(input), Span::styled("▏", Style::default().fg(MUTED))])
    }
}

fn draw_entry(frame: &mut Frame, area: Rect, input: &str) {
    let [header, body] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let title = Paragraph::new(Line::from(APP_TITLE).bold().centered())
        .block(Block::bordered())
        .style(header_style());
    frame.render_widget(title, header);

    let [_, input_area, hint_area, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(body);
    let [input_area] = Layout::horizontal([Constraint::Max(60)])
        .flex(Flex::Center)
        .areas(input_area);
    let [hint_area] = Layout::horizontal([Constraint::Max(60)])
        .flex(Flex::Center)
        .areas(hint_area);

    let search = Paragraph::new(query_line(input)).block(Block::bordered().title(" Search "));
    frame.render_widget(search, input_area);

    let hint = if input.trim().is_empty() {
        "Type a query · Esc quit"
    } else {
        "Enter search · Esc quit"
    };
    frame.render_widget(
        Paragraph::new(Line::from(hint).centered()).style(Style::default().fg(MUTED)),
        hint_area,
    );
}

fn draw_results<S: RepositorySearch + 'static>(
    frame: &mut Frame,
    area: Rect,
    screen: &ResultsScreen<S>,
    throbber: &ThrobberState,
    can_go_back: bool,
) {
    let [top, body] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
    let controller = screen.controller();
    let loading = controller.is_loading();

    let mut line = query_line(screen.input());
    if loading {
        line.spans.insert(0, Throbber::default().to_symbol_span(throbber));
    }
    let title = if can_go_back {
        " ← Esc  Search "
    } else {
        " Search "
    };
    let search = Paragraph::new(line).block(Block::bordered().title(title).style(header_style()));
    frame.render_widget(search, top);

    match ResultsBody::new(controller.results(), loading) {
        ResultsBody::Loading => {
            let mut line = Line::from(Throbber::default().to_symbol_span(throbber));
            line.spans.push(Span::raw(LOADING_TEXT));
            draw_centered(frame, body, line.centered());
        }
        ResultsBody::Empty => {
            draw_centered(frame, body, Line::from(NO_RESULTS_TEXT).centered());
        }
        ResultsBody::List(rows) => {
            let items: Vec<ListItem> = rows
                .iter()
                .map(|row| {
                    let mut text = Text::from(Line::from(row.name).bold());
                    if let Some(description) = row.description {
                        text.push_line(Line::from(description).fg(MUTED));
                    }
                    ListItem::new(text)
                })
                .collect();

            let list = List::new(items)
                .block(Block::bordered().title(format!(" {} repositories ", rows.len())))
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("› ");
            let mut state = ListState::default().with_selected(Some(screen.view().cursor()));
            frame.render_stateful_widget(list, body, &mut state);
        }
    }
}

fn draw_centered(frame: &mut Frame, area: Rect, line: Line<'_>) {
    let [middle] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(Paragraph::new(line), middle);
}

fn detail_lines(fields: &DetailFields) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(full_name) = &fields.full_name {
        lines.push(Line::from(full_name.clone()).fg(MUTED));
    }
    if let Some(description) = &fields.description {
        lines.push(Line::from(description.clone()));
    }

    let mut details = Vec::new();
    if let Some(language) = &fields.language {
        details.push(format!("● {}", language));
    }
    if let Some(stars) = &fields.stars {
        details.push(format!("★ {}", stars));
    }
    if let Some(updated) = &fields.updated {
        details.push(format!("updated {}", updated));
    }
    if !details.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(details.join("   ")).fg(MUTED));
    }

    if let Some(url) = &fields.url {
        lines.push(Line::from(url.clone()).fg(MUTED).italic());
    }
    lines
}

/// Button caption of the detail view.
pub fn download_label(progress: ProgressState) -> String {
    let percent = progress.percent();
    if percent < COMPLETE {
        format!("Download ({}%)", percent)
    } else {
        "Downloaded".to_string()
    }
}

fn draw_detail(frame: &mut Frame, area: Rect, expanded: &ExpandedItem, now: DateTime<Utc>) {
    let fields = DetailFields::new(expanded.repo(), now);
    let progress = expanded.progress();

    let [popup] = Layout::horizontal([Constraint::Percentage(80)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(14)])
        .flex(Flex::End)
        .areas(popup);

    let block = Block::bordered()
        .title(Line::from(format!(" {} ", fields.name)).bold())
        .title_bottom(Line::from(" Enter/d download · Esc close ").right_aligned());
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let [text_area, button_area, gauge_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(detail_lines(&fields)).wrap(Wrap { trim: true }),
        text_area,
    );

    let button = Line::from(format!("[ {} ]", download_label(progress)))
        .bold()
        .centered();
    frame.render_widget(Paragraph::new(button), button_area);

    if progress.percent() < COMPLETE {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(MUTED).bg(Color::DarkGray))
            .percent(u16::from(progress.percent()));
        frame.render_widget(gauge, gauge_area);
    }
}
