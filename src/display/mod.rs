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

//! Derived, user-facing playback display state.
//!
//! [`DisplayState`] is never a source of truth. It is recomputed by
//! [`derive`] from the playback state, the backend position and the loaded
//! entry whenever anything relevant changes, so the time labels, the
//! now-playing text and the play button icon can never drift apart.

use crate::{
    model::{PlaybackState, PlaylistEntry, PositionInfo},
    util::format::format_millis,
};

/// Shown in place of the position and duration when nothing is playing.
pub(crate) const UNKNOWN_TIME: &str = "--:--";

/// Shown in place of the track name when nothing is playing.
pub(crate) const NOTHING_PLAYING: &str = "---";

/// The icon shown on the play/pause button.
///
/// This is the action the button will perform, so it shows `Pause` only while
/// playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayIcon {
    Play,
    Pause,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DisplayState {
    pub(crate) position_text: String,
    pub(crate) duration_text: String,
    pub(crate) now_playing_text: String,
    pub(crate) play_icon: PlayIcon,
    /// Raw values backing the position slider, both zero when stopped.
    pub(crate) position: PositionInfo,
}

impl DisplayState {
    /// The fixed display used whenever playback is stopped.
    pub(crate) fn idle() -> Self {
        Self {
            position_text: UNKNOWN_TIME.to_string(),
            duration_text: UNKNOWN_TIME.to_string(),
            now_playing_text: NOTHING_PLAYING.to_string(),
            play_icon: PlayIcon::Play,
            position: PositionInfo::default(),
        }
    }

    /// Fraction of the track played, in `0.0..=1.0`.
    pub(crate) fn progress(&self) -> f64 {
        if self.position.duration_ms == 0 {
            0.0
        } else {
            (self.position.current_ms as f64 / self.position.duration_ms as f64).clamp(0.0, 1.0)
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Computes the display for the given playback situation.
///
/// # Arguments
///
/// * `state` - The playback state reported by the backend.
/// * `position` - The backend's current position and duration.
/// * `now_playing` - The entry loaded into the backend, if any.
pub(crate) fn derive(
    state: PlaybackState,
    position: PositionInfo,
    now_playing: Option<&PlaylistEntry>,
) -> DisplayState {
    let play_icon = match state {
        PlaybackState::Stopped => return DisplayState::idle(),
        PlaybackState::Playing => PlayIcon::Pause,
        PlaybackState::Paused => PlayIcon::Play,
    };

    DisplayState {
        position_text: format_millis(position.current_ms),
        duration_text: format_millis(position.duration_ms),
        now_playing_text: now_playing
            .map(PlaylistEntry::display_name)
            .unwrap_or_else(|| NOTHING_PLAYING.to_string()),
        play_icon,
        position,
    }
}
