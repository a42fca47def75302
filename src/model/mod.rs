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

//! Domain models for the playback session.
//!
//! This module defines the small set of value types shared by the playlist
//! store, the session controller and the media backend: playlist entries,
//! the playback state, position information and the volume level.

pub(crate) mod playlist;

use std::path::{Path, PathBuf};

/// A playable file reference held by the playlist.
///
/// Entries are immutable once created, duplicates are allowed and identity is
/// positional (an entry is addressed by its index in the playlist).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaylistEntry {
    path: PathBuf,
}

impl PlaylistEntry {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// The base file name of the entry, extension included.
    ///
    /// Falls back to the full path when the path has no final component (for
    /// example `/` or `..`).
    pub(crate) fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// Represents the current playback status of the media backend.
///
/// `Stopped` means either nothing is loaded or playback was explicitly
/// stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Position and duration of the loaded media, in whole milliseconds.
///
/// Only meaningful while the playback state is not [`PlaybackState::Stopped`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PositionInfo {
    pub(crate) current_ms: u64,
    pub(crate) duration_ms: u64,
}

/// Output volume, always within `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Volume(u8);

impl Volume {
    pub(crate) const MAX: u8 = 100;
    pub(crate) const DEFAULT: u8 = 50;

    /// Creates a volume, clamping the level into `0..=100`.
    pub(crate) fn new(level: i32) -> Self {
        Self(level.clamp(0, i32::from(Self::MAX)) as u8)
    }

    pub(crate) fn level(self) -> u8 {
        self.0
    }

    /// Returns a new volume offset by `delta`, clamped at both ends.
    pub(crate) fn adjusted(self, delta: i32) -> Self {
        Self::new(i32::from(self.0).saturating_add(delta))
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
