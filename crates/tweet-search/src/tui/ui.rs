//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthChar;

use super::app::App;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Results
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Search input
        ])
        .split(frame.area());

    render_results(frame, app, chunks[0]);
    render_status(frame, app, chunks[1]);
    render_search_input(frame, app, chunks[2]);
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let selection_bg = Color::Rgb(38, 38, 38);
    let selected = app.list_state.selected();
    let is_error = app.controller.last_was_error();
    // Borders plus the two-column selection prefix
    let text_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = app
        .controller
        .results()
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let is_selected = selected == Some(i);
            let prefix = if is_selected { "▌ " } else { "  " };
            let text_style = if is_error {
                Style::default().fg(Color::Red)
            } else if is_selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let line = Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::LightRed)),
                Span::styled(single_line(text, text_width), text_style),
            ]);
            let item = ListItem::new(line);
            if is_selected {
                item.style(Style::default().bg(selection_bg))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", app.endpoint)),
    );

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let line = if let Some(started) = app.controller.busy_since() {
        Line::from(Span::styled(
            format!("  {} Searching...", spinner_frame(started)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM),
        ))
    } else if app.controller.last_query().is_none() {
        Line::from(Span::styled(
            "  Enter to search · ↑/↓ to scroll · Ctrl+Home/End to jump · Esc to quit",
            dim,
        ))
    } else if app.controller.last_was_error() {
        Line::from(Span::styled("  Search failed", Style::default().fg(Color::Red)))
    } else {
        let count = app.controller.results().len();
        let noun = if count == 1 { "result" } else { "results" };
        let mut spans = vec![Span::styled(format!("  {} {} ", count, noun), dim)];
        if let Some(elapsed) = app.controller.last_elapsed() {
            spans.push(Span::styled(
                format!("({})", format_duration(elapsed)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM),
            ));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the search input (minimal, thick bar on left)
fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let cursor_style = Style::default().fg(Color::White).bg(Color::DarkGray);
    let text_style = Style::default().fg(Color::White);

    let (before, after) = app.input.text.split_at(app.input.cursor);
    let cursor_char = after.chars().next();
    let after_cursor = cursor_char.map(|c| &after[c.len_utf8()..]).unwrap_or("");

    let mut spans = vec![Span::styled("▌ ", Style::default().fg(Color::Yellow))];
    if !before.is_empty() {
        spans.push(Span::styled(before, text_style));
    }
    match cursor_char {
        Some(c) => spans.push(Span::styled(c.to_string(), cursor_style)),
        None => spans.push(Span::styled("█", Style::default().fg(Color::White))),
    }
    if !after_cursor.is_empty() {
        spans.push(Span::styled(after_cursor, text_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Collapse whitespace runs (tweets may contain newlines) and cut to `max_width` columns.
fn single_line(text: &str, max_width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::new();
    let mut width = 0;
    let mut chars = flat.chars().peekable();
    while let Some(ch) = chars.next() {
        let w = ch.width().unwrap_or(0);
        let reserve = if chars.peek().is_some() { 1 } else { 0 };
        if width + w + reserve > max_width {
            out.push('…');
            return out;
        }
        out.push(ch);
        width += w;
    }
    out
}

fn spinner_frame(started_at: Instant) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let elapsed = started_at.elapsed().as_millis() / 80;
    FRAMES[(elapsed as usize) % FRAMES.len()]
}

fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}
