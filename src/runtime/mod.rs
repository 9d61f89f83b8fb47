use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::logging;

mod event_loop;
mod events;
mod settings;
mod startup;

pub use events::AppEvent;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let settings = settings::load_settings();

    if args.iter().any(|a| a == "--print-config") {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    match logging::init(&settings.logging) {
        Ok(path) => info!(log = %path.display(), "echollage starting"),
        // Logging is optional; failures should not prevent the app from starting.
        Err(e) => eprintln!("echollage: logging disabled: {e}"),
    }

    let initial_artist = args.into_iter().find(|a| !a.starts_with("--"));

    let (events_tx, events_rx) = mpsc::channel::<AppEvent>();
    let mut services = startup::start_services(&settings, events_tx)?;
    let mut app = App::new(&settings);
    app.set_playback_handle(services.audio.playback_handle());

    if let Some(name) = initial_artist {
        startup::submit_initial_artist(&mut app, &mut services, &name);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut app, &mut services, &events_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    services.api.shutdown();
    info!("echollage stopped");

    run_result
}
