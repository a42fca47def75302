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

//! Application event distribution and orchestration.
//!
//! Every input to the player (key presses, timer ticks, backend events and
//! intents raised by other components) arrives as an [`AppEvent`] on a single
//! channel and is handled on the main thread, one event at a time, so session
//! operations never interleave.
//!
//! # Architecture
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum.
//! 2. **Process**: Keys are mapped to [`Intent`]s and dispatched to the
//!    playback session; backend events are reconciled with it.
//! 3. **Sync**: The display is re-derived, and the terminal is re-drawn
//!    whenever it changed or the user did something.

use std::{io::Stdout, path::PathBuf};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::error;

use crate::{
    App, files,
    player::BackendEvent,
    render::draw,
    session::Intent,
    sync::SyncTrigger,
};

const VOLUME_DELTA: i32 = 5;

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    Intent(Intent),
    OpenPaths(Vec<PathBuf>),

    Backend(BackendEvent),

    Tick,

    ExitApplication,

    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until an exit event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Ok(event) = app.event_rx.recv() {
        let trigger = match event {
            AppEvent::ExitApplication => break,

            AppEvent::Key(key) => {
                process_key_event(app, key)?;
                SyncTrigger::Intent
            }

            AppEvent::Intent(intent) => {
                app.dispatch(intent);
                SyncTrigger::Intent
            }

            AppEvent::OpenPaths(paths) => {
                let files = files::expand_paths(&paths, &app.config.extensions);
                app.dispatch(Intent::OpenFiles(files));
                SyncTrigger::Intent
            }

            AppEvent::Backend(event) => {
                app.session.handle_backend_event(&event);
                SyncTrigger::Backend
            }

            AppEvent::Tick => SyncTrigger::Tick,

            AppEvent::FatalError(message) => {
                error!("{}", message);
                app.session.backend_lost();
                app.status = Some(message);
                SyncTrigger::Backend
            }
        };

        let changed = app.sync.refresh(trigger, &app.session).is_some();
        if changed || trigger != SyncTrigger::Tick {
            terminal.draw(|f| draw(f, app))?;
        }
    }

    Ok(())
}

/// Routes a key press to the command line, the playlist, or the global
/// playback controls, in that order.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    let event = Event::Key(key);
    if app.commander.handle_event(&event, &app.event_tx)? {
        return Ok(());
    }

    if let Some(intent) = app.playlist_view.process_event(&event, app.session.playlist()) {
        app.dispatch(intent);
        return Ok(());
    }

    if let Some(intent) = global_key_intent(key) {
        app.dispatch(intent);
    } else if let KeyCode::Char('q') = key.code {
        app.event_tx.send(AppEvent::ExitApplication)?;
    }

    Ok(())
}

/// Maps the playback control keys to intents.
fn global_key_intent(key: KeyEvent) -> Option<Intent> {
    let intent = match key.code {
        KeyCode::Char('p') => Intent::TogglePlayPause,
        KeyCode::Char('s') => Intent::Stop,
        KeyCode::Char('n') => Intent::Next,
        KeyCode::Char('N') | KeyCode::Char('b') => Intent::Previous,
        KeyCode::Char('.') | KeyCode::Right => Intent::SkipForward,
        KeyCode::Char(',') | KeyCode::Left => Intent::SkipBack,
        KeyCode::Char('+') | KeyCode::Char('=') => Intent::AdjustVolume(VOLUME_DELTA),
        KeyCode::Char('-') | KeyCode::Char('_') => Intent::AdjustVolume(-VOLUME_DELTA),
        _ => return None,
    };

    Some(intent)
}
