use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::api::ApiReply;
use crate::app::{App, Direction, Screen};
use crate::assets::AssetEvent;
use crate::audio::AudioEvent;
use crate::config;
use crate::ui;

use super::AppEvent;
use super::startup::{Services, apply, apply_all};

/// Longest time the loop waits for terminal input before redrawing.
const FRAME: Duration = Duration::from_millis(50);

/// How long to block on terminal input: one frame, or less when the
/// playlist tick is due sooner.
pub fn poll_timeout(now: Instant, deadline: Option<Instant>) -> Duration {
    match deadline {
        Some(d) => d.saturating_duration_since(now).min(FRAME),
        None => FRAME,
    }
}

/// Main terminal event loop: handles input, UI drawing, worker events and
/// the playlist tick. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    services: &mut Services,
    events: &Receiver<AppEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = events.try_recv() {
            handle_app_event(ev, app, services);
        }

        if let Some(effect) = app.tick(Instant::now()) {
            apply(services, effect);
        }

        app.advance_spinner();
        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        let timeout = poll_timeout(Instant::now(), app.controller.next_deadline());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, services)? {
                    services
                        .audio
                        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_app_event(ev: AppEvent, app: &mut App, services: &mut Services) {
    let now = Instant::now();
    match ev {
        AppEvent::Api(ApiReply::Entered { name, result }) => {
            debug!(name = %name, ok = result.is_ok(), "entry lookup finished");
            let effects = app.entered(result, now);
            apply_all(services, effects);
        }
        AppEvent::Api(ApiReply::Playlist { request, result }) => {
            app.playlist_loaded(request, result, now);
        }
        AppEvent::Api(ApiReply::Similar { artist_id, result }) => {
            app.similar_loaded(&artist_id, result)
        }
        AppEvent::Asset(AssetEvent::Ready { track, media }) => {
            app.media_ready(track, media);
        }
        AppEvent::Asset(AssetEvent::Failed { track, error }) => {
            app.media_failed(&track, &error);
        }
        AppEvent::Audio(AudioEvent::Finished { cell, track_id }) => {
            let effects = app.playback_finished(cell, &track_id);
            apply_all(services, effects);
        }
        AppEvent::Audio(AudioEvent::DecodeFailed { cell, reason, .. }) => {
            app.playback_failed(cell, &reason);
        }
        AppEvent::Audio(AudioEvent::DeviceUnavailable(_)) => {
            app.status = Some("No audio device; previews are silent.".to_string());
        }
    }
}

/// Returns `Ok(true)` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    services: &mut Services,
) -> Result<bool, Box<dyn std::error::Error>> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    if app.screen == Screen::Entry {
        match key.code {
            KeyCode::Esc => return Ok(true),
            KeyCode::Enter => {
                if let Some(effect) = app.submit_entry() {
                    apply(services, effect);
                }
            }
            KeyCode::Backspace => app.entry.pop_char(),
            KeyCode::Char(c) => app.entry.push_char(c),
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Char('h') | KeyCode::Left => app.move_hover(Direction::Left),
        KeyCode::Char('j') | KeyCode::Down => app.move_hover(Direction::Down),
        KeyCode::Char('k') | KeyCode::Up => app.move_hover(Direction::Up),
        KeyCode::Char('l') | KeyCode::Right => app.move_hover(Direction::Right),
        KeyCode::Char(' ') | KeyCode::Enter => {
            let effects = app.toggle_hovered();
            apply_all(services, effects);
        }
        KeyCode::Char('n') => {
            if let Some(effect) = app.next_similar_page() {
                apply(services, effect);
            }
        }
        KeyCode::Char('d') => {
            if let Some(tile) = app.clear_hovered() {
                debug!(track = %tile.track.id, "tile cleared");
            }
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as usize) - ('1' as usize);
            let effects = app.choose_similar(index);
            apply_all(services, effects);
        }
        _ => {}
    }

    Ok(false)
}
