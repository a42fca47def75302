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

//! Typed failures raised by the playlist store, the session controller and
//! the media backend.

use thiserror::Error;

/// Playback errors.
///
/// None of these ever reach the user; the session logs them at its intent
/// boundary and leaves the display untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum PlaybackError {
    #[error("index {index} is out of range for a playlist of {len} entries")]
    OutOfRange { index: usize, len: usize },

    #[error("no media is loaded")]
    NoMediaLoaded,

    #[error("the playlist is empty")]
    EmptyPlaylist,

    #[error("no playlist row is selected")]
    NothingSelected,

    #[error("media backend failure: {0}")]
    BackendFailure(String),
}

impl PlaybackError {
    /// Whether this error only reports an unmet precondition, as opposed to a
    /// fault in the media backend.
    pub(crate) fn is_precondition(&self) -> bool {
        !matches!(self, Self::BackendFailure(_))
    }
}

pub(crate) type Result<T> = std::result::Result<T, PlaybackError>;
