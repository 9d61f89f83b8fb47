//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`: the
//! artist entry screen and the collage grid with its status panel.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, PlaybackState, Screen};
use crate::collage::{CellId, Tile};
use crate::config::UiSettings;
use crate::controller::ControllerState;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("h/j/k/l", "move");
    map.insert("space/enter", "play/pause");
    map.insert("1-9", "pick similar artist");
    map.insert("n", "more similar");
    map.insert("d", "clear tile");
    map.insert("q", "quit");
    map
});

/// Render the controls help text for the collage screen.
fn controls_text() -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["h/j/k/l", "space/enter", "1-9", "n", "d", "q"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" echollage ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    match app.screen {
        Screen::Entry => draw_entry(frame, app, chunks[1], chunks[2], chunks[3]),
        Screen::Collage => {
            draw_status(frame, app, ui_settings, chunks[1]);
            draw_grid(frame, app, ui_settings, chunks[2]);

            let footer = Paragraph::new(controls_text())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" controls ")
                        .padding(padded()),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(footer, chunks[3]);
        }
    }
}

fn draw_entry(frame: &mut Frame, app: &App, input_area: Rect, message_area: Rect, footer_area: Rect) {
    let entry = &app.entry;
    let cursor = if entry.searching { "" } else { "_" };
    let input = Paragraph::new(format!("{}{}", entry.input, cursor)).block(
        Block::bordered()
            .padding(padded())
            .title(" artist "),
    );
    frame.render_widget(input, input_area);

    let mut lines = Vec::new();
    if let Some(status) = &entry.status {
        let mut text = status.clone();
        if entry.searching {
            let frame_idx = app.spinner_frame % SPINNER.len();
            text = format!("{} {}", SPINNER[frame_idx], text);
        }
        lines.push(Line::from(text));
    }
    let message = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::vertical(1)))
        .wrap(Wrap { trim: true });
    frame.render_widget(message, message_area);

    let footer = Paragraph::new("[enter] start | [esc] quit").block(
        Block::default()
            .borders(Borders::ALL)
            .title(" controls ")
            .padding(padded()),
    );
    frame.render_widget(footer, footer_area);
}

fn draw_status(frame: &mut Frame, app: &App, ui_settings: &UiSettings, area: Rect) {
    let mut parts: Vec<String> = Vec::new();

    if let Some(artist) = &app.focal_artist {
        parts.push(format!(" FOCAL: {}", artist.name));
    }

    // playback info
    match app
        .collage
        .active()
        .and_then(|cell| app.collage.tile(cell).map(|tile| (cell, tile)))
    {
        Some((cell, tile)) => {
            let state = match app.playback {
                PlaybackState::Playing => "Playing",
                PlaybackState::Paused => "Paused",
                PlaybackState::Stopped => "Stopped",
            };
            let elapsed = app
                .playback_handle
                .as_ref()
                .and_then(|h| h.lock().ok().map(|info| info.elapsed_in(cell)))
                .unwrap_or(Duration::ZERO);
            parts.push(format!(
                "Song: {} [{}]",
                tile.track.display(),
                format_mmss(elapsed)
            ));
            parts.push(state.to_string());
        }
        None => parts.push("Stopped".to_string()),
    }

    if let ControllerState::Loading { .. } = app.controller.state() {
        parts.push("Loading playlist...".to_string());
    }
    parts.push(format!("Queue: {}", app.controller.queue_len()));
    parts.push(format!("Tiles: {}/{}", app.collage.occupied(), app.collage.len()));
    if let Some(status) = &app.status {
        parts.push(status.clone());
    }

    let mut lines = vec![Line::from(parts.join(&ui_settings.status_separator))];
    if !app.similar.is_empty() {
        let similar = app
            .similar
            .iter()
            .take(9)
            .enumerate()
            .map(|(i, a)| format!("{}:{}", i + 1, a.name))
            .collect::<Vec<String>>()
            .join(&ui_settings.status_separator);
        lines.push(Line::from(format!("Similar: {}", similar)).dim());
    }

    let status_par = Paragraph::new(lines)
        .block(Block::bordered().padding(padded()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, area);
}

fn draw_grid(frame: &mut Frame, app: &App, ui_settings: &UiSettings, area: Rect) {
    let collage = &app.collage;
    let (width, height) = (collage.width() as u32, collage.height() as u32);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..height).map(|_| Constraint::Ratio(1, height)))
        .split(area);

    for (r, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..width).map(|_| Constraint::Ratio(1, width)))
            .split(*row_area);
        for (c, cell_area) in cols.iter().enumerate() {
            let cell = collage.cell_at(r, c);
            draw_tile(frame, app, ui_settings, cell, collage.tile(cell), *cell_area);
        }
    }
}

fn draw_tile(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    cell: CellId,
    tile: Option<&Tile>,
    area: Rect,
) {
    let active = app.collage.active() == Some(cell);
    let playing = active && app.playback == PlaybackState::Playing;
    let hovering = app.collage.hovering() == Some(cell);

    let mut block = Block::default().borders(Borders::ALL);
    if playing {
        block = block
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(Color::Yellow));
    } else if hovering {
        block = block.border_type(BorderType::Double);
    } else {
        block = block.border_style(Style::default().add_modifier(Modifier::DIM));
    }

    let Some(tile) = tile else {
        frame.render_widget(block, area);
        return;
    };

    let indicator = if playing { "▶" } else if active { "❚❚" } else { " " };
    block = block.title(Span::raw(format!(" {} ", indicator)));

    let mut lines: Vec<Line> = Vec::new();
    if ui_settings.show_track_info {
        lines.push(Line::from(tile.track.artist_name.clone()).bold());
        lines.push(Line::from(tile.track.title.clone()));
    }

    let [r, g, b] = tile.swatch;
    let mut style = Style::default().bg(Color::Rgb(r, g, b)).fg(Color::White);
    if hovering {
        style = style.add_modifier(Modifier::REVERSED);
    }
    let body = Paragraph::new(lines)
        .style(style)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}
