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

//! Command-line input logic and state management.
//!
//! Typing `:` activates a one-line text input. When a command is submitted it
//! is parsed into a [`CommanderCommand`] and forwarded to the event loop as
//! the corresponding application event.
//!
//! # Commands
//!
//! * `open <path>` - add a file, or every audio file in a directory
//! * `vol <0-100>` - set the volume
//! * `seek <mm:ss | h:mm:ss | ms>` - jump to a position in the current track
//! * `stop`, `next`, `prev` - playback controls
//! * `clear` - remove every entry
//! * `q` - quit

use std::{path::PathBuf, sync::mpsc::Sender};

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tracing::debug;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{actions::events::AppEvent, session::Intent, util::format::parse_time};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CommanderCommand {
    Quit,
    Open(PathBuf),
    Volume(i32),
    Seek(u64),
    Stop,
    Next,
    Previous,
    Clear,
}

impl CommanderCommand {
    fn into_event(self) -> AppEvent {
        match self {
            Self::Quit => AppEvent::ExitApplication,
            Self::Open(path) => AppEvent::OpenPaths(vec![path]),
            Self::Volume(level) => AppEvent::Intent(Intent::SetVolume(level)),
            Self::Seek(position_ms) => AppEvent::Intent(Intent::SliderSeek(position_ms)),
            Self::Stop => AppEvent::Intent(Intent::Stop),
            Self::Next => AppEvent::Intent(Intent::Next),
            Self::Previous => AppEvent::Intent(Intent::Previous),
            Self::Clear => AppEvent::Intent(Intent::RemoveAll),
        }
    }
}

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Handles a terminal event, returning whether it was consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if a submitted command cannot be sent to the event
    /// loop.
    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> Result<bool> {
        let Event::Key(key_event) = event else {
            return Ok(false);
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.active = true;
                return Ok(true);
            }
            return Ok(false);
        }

        match key_event.code {
            KeyCode::Esc => {
                self.active = false;
                self.input.reset();
            }

            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                self.input.reset();
                self.active = false;

                match parse_command(&buffer) {
                    Some(command) => event_tx.send(command.into_event())?,
                    None if buffer.is_empty() => {}
                    None => debug!("Unknown command: {}", buffer),
                }
            }

            _ => {
                // Delegate all other key events to the managed input component.
                self.input.handle_event(event);
            }
        }

        Ok(true)
    }
}

/// Parses a submitted command line.
pub(crate) fn parse_command(buffer: &str) -> Option<CommanderCommand> {
    let parts: Vec<&str> = buffer.split_whitespace().collect();

    let command = match parts.as_slice() {
        ["q"] | ["quit"] => CommanderCommand::Quit,

        // Paths may contain spaces
        ["open", path_parts @ ..] if !path_parts.is_empty() => {
            CommanderCommand::Open(PathBuf::from(path_parts.join(" ")))
        }

        ["vol", level] => CommanderCommand::Volume(level.parse().ok()?),
        ["seek", position] => CommanderCommand::Seek(parse_time(position)?),

        ["stop"] => CommanderCommand::Stop,
        ["next"] => CommanderCommand::Next,
        ["prev"] => CommanderCommand::Previous,
        ["clear"] => CommanderCommand::Clear,

        _ => return None,
    };

    Some(command)
}
