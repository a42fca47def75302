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

//! Media backend contract.
//!
//! The session controller never decodes or outputs audio itself. It drives an
//! implementation of [`MediaBackend`], which plays one file at a time and
//! reports state and position changes asynchronously as [`BackendEvent`]s.
//!
//! # Superseded loads
//!
//! Every call to [`MediaBackend::load`] issues a fresh [`LoadToken`] and every
//! event is tagged with the token of the load that produced it. Events whose
//! token is not the one currently loaded (including any event arriving after
//! a stop) are discarded by [`BackendSnapshot::apply`], so a late event from
//! an earlier file can never corrupt the current state.

#[cfg(test)]
pub(crate) mod fake;
pub(crate) mod mpv;

use crate::{
    error::Result,
    model::{PlaybackState, PlaylistEntry, PositionInfo, Volume},
};

/// Identifies one load of a file into the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct LoadToken(u64);

impl LoadToken {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum BackendEventKind {
    StateChanged(PlaybackState),
    PositionChanged(u64),
    DurationChanged(u64),
    Failure(String),
}

/// An asynchronous notification from the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BackendEvent {
    pub(crate) token: LoadToken,
    pub(crate) kind: BackendEventKind,
}

/// Imperative contract consumed by the session controller.
///
/// Commands return as soon as they are issued; their effect is confirmed
/// later through events. Queries answer from the backend's latest known
/// state.
pub(crate) trait MediaBackend {
    /// Associates a file with the backend, replacing any loaded media.
    fn load(&mut self, entry: &PlaylistEntry) -> Result<LoadToken>;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Stops playback and unloads the current media.
    fn stop(&mut self) -> Result<()>;

    /// Seeks to an absolute position in milliseconds.
    fn seek(&mut self, position_ms: u64) -> Result<()>;

    fn set_volume(&mut self, volume: Volume) -> Result<()>;

    fn state(&self) -> PlaybackState;

    fn position_ms(&self) -> u64;

    fn duration_ms(&self) -> u64;

    /// Token of the currently loaded media, if any.
    fn loaded_token(&self) -> Option<LoadToken>;

    fn is_loaded(&self) -> bool {
        self.loaded_token().is_some()
    }

    fn position(&self) -> PositionInfo {
        PositionInfo {
            current_ms: self.position_ms(),
            duration_ms: self.duration_ms(),
        }
    }

    /// Reconciles an incoming event with the backend's known state.
    ///
    /// Returns `false` if the event belongs to a superseded load and was
    /// ignored.
    fn apply_event(&mut self, event: &BackendEvent) -> bool;

    /// Drops any loaded media after the backend has failed irrecoverably.
    fn lost(&mut self);
}

/// The locally known state of a backend, updated optimistically as commands
/// are issued and reconciled as events arrive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BackendSnapshot {
    pub(crate) token: Option<LoadToken>,
    pub(crate) state: PlaybackState,
    pub(crate) position_ms: u64,
    pub(crate) duration_ms: u64,
}

impl BackendSnapshot {
    /// Resets the snapshot for a newly loaded file.
    pub(crate) fn loaded(&mut self, token: LoadToken) {
        *self = Self {
            token: Some(token),
            ..Self::default()
        };
    }

    pub(crate) fn unloaded(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn apply(&mut self, event: &BackendEvent) -> bool {
        if self.token != Some(event.token) {
            return false;
        }

        match &event.kind {
            // Playback ending on its own unloads the media, just as an
            // explicit stop does.
            BackendEventKind::StateChanged(PlaybackState::Stopped) => self.unloaded(),
            BackendEventKind::StateChanged(state) => self.state = *state,
            BackendEventKind::PositionChanged(position_ms) => self.position_ms = *position_ms,
            BackendEventKind::DurationChanged(duration_ms) => self.duration_ms = *duration_ms,
            BackendEventKind::Failure(_) => {}
        }

        true
    }
}
