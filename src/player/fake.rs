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

//! Scripted in-memory backend for session tests.
//!
//! Commands take effect immediately and are recorded in order, so tests can
//! assert both the resulting state and the exact backend interaction.

use std::path::PathBuf;

use crate::{
    error::{PlaybackError, Result},
    model::{PlaybackState, PlaylistEntry, Volume},
    player::{BackendEvent, BackendEventKind, BackendSnapshot, LoadToken, MediaBackend},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Load(PathBuf),
    Play,
    Pause,
    Stop,
    Seek(u64),
    SetVolume(u8),
}

#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    pub(crate) snapshot: BackendSnapshot,
    pub(crate) calls: Vec<Call>,
    pub(crate) volume: Option<u8>,
    /// Duration reported for every file loaded from now on.
    pub(crate) next_duration_ms: u64,
    /// When set, every command fails with a backend failure.
    pub(crate) broken: bool,
    last_token: LoadToken,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_duration(duration_ms: u64) -> Self {
        Self {
            next_duration_ms: duration_ms,
            ..Self::default()
        }
    }

    /// Simulates playback progressing to `position_ms`.
    pub(crate) fn set_position(&mut self, position_ms: u64) {
        self.snapshot.position_ms = position_ms;
    }

    /// Builds an event for the currently loaded media.
    pub(crate) fn event(&self, kind: BackendEventKind) -> BackendEvent {
        BackendEvent {
            token: self.snapshot.token.unwrap_or(self.last_token),
            kind,
        }
    }

    pub(crate) fn loaded_paths(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Load(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: Call) -> Result<()> {
        if self.broken {
            return Err(PlaybackError::BackendFailure(format!("{:?} failed", call)));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl MediaBackend for FakeBackend {
    fn load(&mut self, entry: &PlaylistEntry) -> Result<LoadToken> {
        self.record(Call::Load(entry.path().to_path_buf()))?;
        self.last_token = self.last_token.next();
        self.snapshot.loaded(self.last_token);
        self.snapshot.duration_ms = self.next_duration_ms;
        Ok(self.last_token)
    }

    fn play(&mut self) -> Result<()> {
        self.record(Call::Play)?;
        if self.snapshot.token.is_some() {
            self.snapshot.state = PlaybackState::Playing;
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.record(Call::Pause)?;
        if self.snapshot.token.is_some() {
            self.snapshot.state = PlaybackState::Paused;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.record(Call::Stop)?;
        self.snapshot.unloaded();
        Ok(())
    }

    fn seek(&mut self, position_ms: u64) -> Result<()> {
        self.record(Call::Seek(position_ms))?;
        self.snapshot.position_ms = position_ms;
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> Result<()> {
        self.record(Call::SetVolume(volume.level()))?;
        self.volume = Some(volume.level());
        Ok(())
    }

    fn state(&self) -> PlaybackState {
        self.snapshot.state
    }

    fn position_ms(&self) -> u64 {
        self.snapshot.position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.snapshot.duration_ms
    }

    fn loaded_token(&self) -> Option<LoadToken> {
        self.snapshot.token
    }

    fn apply_event(&mut self, event: &BackendEvent) -> bool {
        self.snapshot.apply(event)
    }

    fn lost(&mut self) {
        self.broken = true;
        self.snapshot.unloaded();
    }
}
