// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Barely.
//!
//! A minimal terminal audio playlist player.
//!
//! Files are added to a playlist and played one at a time through MPV, while
//! the interface shows the elapsed and total time of the current track.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** owns the playback session and the terminal, and
//!   processes every event strictly one at a time.
//! * The **MPV Worker** decodes and outputs audio, reporting state and
//!   position changes back as events.
//! * The **Input** and **Tick** threads feed key presses and the one-second
//!   position sync tick into the same event channel.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between threads is handled via `std::sync::mpsc` channels.

mod actions;
mod commander;
mod components;
mod config;
mod display;
mod error;
mod files;
mod logging;
mod model;
mod player;
mod render;
mod session;
mod sync;
mod theme;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self},
    path::PathBuf,
    sync::mpsc::{self, Receiver, Sender},
    thread,
};
use tracing::{info, warn};

use crate::{
    actions::events::{AppEvent, process_events},
    commander::Commander,
    components::PlaylistView,
    config::AppConfig,
    player::mpv::MpvBackend,
    session::{Intent, PlaybackSession},
    sync::PositionSync,
    theme::Theme,
};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(version, about = "A minimal terminal audio playlist player")]
struct Cli {
    /// Audio files or directories to add to the playlist.
    paths: Vec<PathBuf>,

    /// Initial volume, overriding the configured default.
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(0..=100))]
    volume: Option<i32>,
}

/// Application state.
struct App {
    pub config: AppConfig,

    pub theme: Theme,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub session: PlaybackSession<MpvBackend>,
    pub sync: PositionSync,

    pub playlist_view: PlaylistView,
    pub commander: Commander,

    /// Last message worth showing in the command bar.
    pub status: Option<String>,
}

impl App {
    /// Create a new instance of application state, starting the MPV worker.
    pub fn new(config: AppConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let backend = MpvBackend::new(event_tx.clone());
        let session = PlaybackSession::new(backend, config.volume(), config.skip_step_ms);

        Self {
            config,
            theme: Theme::default(),
            event_tx,
            event_rx,
            session,
            sync: PositionSync::new(),
            playlist_view: PlaylistView::new(),
            commander: Commander::new(),
            status: None,
        }
    }

    /// Dispatches an intent to the session, keeping view state consistent
    /// with any removal.
    pub fn dispatch(&mut self, intent: Intent) {
        if matches!(intent, Intent::RemoveSelected(_) | Intent::RemoveAll) {
            self.playlist_view.clear_selection();
        }
        self.session.dispatch(intent);
    }
}

/// The entry point of the application.
///
/// Parses the command line, loads the configuration, installs logging,
/// manages the terminal lifecycle, and returns an error if any part of the
/// execution fails.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config();
    if let Some(volume) = cli.volume {
        config.default_volume = volume;
    }

    let _log_guard = logging::init_logging(&config).context("Failed to initialise logging")?;
    info!(?config, "Starting");

    let mut app = App::new(config);

    if !cli.paths.is_empty() {
        app.event_tx
            .send(AppEvent::OpenPaths(cli.paths))
            .context("Failed to queue startup files")?;
    }

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    info!("Exiting");
    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    if let Some(hex) = Theme::to_hex(app.theme.background_colour) {
        if let Err(e) = util::term::set_terminal_bg(&hex) {
            warn!("Failed to set terminal background: {}", e);
        }
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to the state it was in before [`setup_terminal`].
///
/// This reverses the changes made by [`setup_terminal`]. It is best-effort
/// and does not return a result, as it runs during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg().ok();
    terminal.show_cursor().ok();
}

/// Starts the input and tick threads and enters the main event loop.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event::Event::Key(key)) => {
                    if tx_keys.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read terminal event: {}", e);
                    break;
                }
            }
        }
    });

    // The position sync tick, the display is also refreshed on every other
    // event.
    sync::spawn_ticker(app.event_tx.clone(), app.config.tick_interval());

    process_events(terminal, app)
}
