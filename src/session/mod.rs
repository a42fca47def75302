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

//! Playback session controller.
//!
//! [`PlaybackSession`] owns the playlist and the volume and is the only
//! component that talks to the [`MediaBackend`]. The presentation layer sends
//! it [`Intent`]s; it applies the navigation and boundary policies, and the
//! display is re-derived afterwards from [`PlaybackSession::display_state`].
//!
//! # Failure handling
//!
//! Every intent is defensive. An unmet precondition (empty playlist, no row
//! selected, nothing loaded, bad index) or a backend failure is caught in
//! [`PlaybackSession::dispatch`], logged, and answered by re-synchronizing
//! with a fresh backend query. Nothing is ever propagated to the caller and
//! nothing is retried.
//!
//! # Boundaries
//!
//! * **Next / Previous** wrap around the ends of the playlist.
//! * **Skip forward** past the end of the track stops playback instead of
//!   clamping to the duration.
//! * **Skip back** clamps at the start of the track and never stops.

use std::{collections::BTreeSet, path::PathBuf};

use tracing::{debug, info, warn};

use crate::{
    display::{self, DisplayState},
    error::{PlaybackError, Result},
    model::{PlaybackState, PlaylistEntry, Volume, playlist::{self, Playlist}},
    player::{BackendEvent, BackendEventKind, LoadToken, MediaBackend},
};

/// Default distance moved by the skip forward and skip back controls.
pub(crate) const DEFAULT_SKIP_STEP_MS: u64 = 10_000;

/// User intents accepted from the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Intent {
    OpenFiles(Vec<PathBuf>),
    DoubleClickRow(usize),
    /// Moves the highlighted row without starting playback.
    Highlight(usize),
    TogglePlayPause,
    Stop,
    Next,
    Previous,
    SkipForward,
    SkipBack,
    SetVolume(i32),
    AdjustVolume(i32),
    RemoveSelected(BTreeSet<usize>),
    RemoveAll,
    SliderSeek(u64),
}

/// The playlist entry currently loaded into the backend.
#[derive(Clone, Debug)]
struct LoadedEntry {
    index: usize,
    entry: PlaylistEntry,
    token: LoadToken,
}

pub(crate) struct PlaybackSession<B: MediaBackend> {
    backend: B,
    playlist: Playlist,
    volume: Volume,
    skip_step_ms: u64,
    loaded: Option<LoadedEntry>,
}

impl<B: MediaBackend> PlaybackSession<B> {
    /// Creates a session and applies the initial volume to the backend.
    pub(crate) fn new(mut backend: B, volume: Volume, skip_step_ms: u64) -> Self {
        if let Err(e) = backend.set_volume(volume) {
            warn!("Failed to apply initial volume: {}", e);
        }

        Self {
            backend,
            playlist: Playlist::new(),
            volume,
            skip_step_ms,
            loaded: None,
        }
    }

    pub(crate) fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub(crate) fn volume(&self) -> Volume {
        self.volume
    }

    pub(crate) fn state(&self) -> PlaybackState {
        self.backend.state()
    }

    /// Index of the playlist entry loaded into the backend, if any.
    pub(crate) fn loaded_index(&self) -> Option<usize> {
        self.loaded.as_ref().map(|loaded| loaded.index)
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Derives the current display from a fresh backend query.
    pub(crate) fn display_state(&self) -> DisplayState {
        display::derive(
            self.backend.state(),
            self.backend.position(),
            self.loaded.as_ref().map(|loaded| &loaded.entry),
        )
    }

    /// Executes an intent, swallowing and logging any failure.
    pub(crate) fn dispatch(&mut self, intent: Intent) {
        debug!(?intent, "Dispatching intent");

        let result = match intent.clone() {
            Intent::OpenFiles(paths) => {
                self.open_files(paths);
                Ok(())
            }
            Intent::DoubleClickRow(index) => self.double_click_row(index),
            Intent::Highlight(index) => self.highlight(index),
            Intent::TogglePlayPause => self.toggle_play_pause(),
            Intent::Stop => self.stop(),
            Intent::Next => self.next(),
            Intent::Previous => self.previous(),
            Intent::SkipForward => self.skip_forward(),
            Intent::SkipBack => self.skip_back(),
            Intent::SetVolume(level) => self.set_volume(Volume::new(level)),
            Intent::AdjustVolume(delta) => self.set_volume(self.volume.adjusted(delta)),
            Intent::RemoveSelected(indices) => self.remove_selected(&indices),
            Intent::RemoveAll => self.remove_all(),
            Intent::SliderSeek(position_ms) => self.slider_seek(position_ms),
        };

        if let Err(e) = result {
            if e.is_precondition() {
                debug!(?intent, "Intent ignored: {}", e);
            } else {
                warn!(?intent, "Intent failed: {}", e);
            }
            self.resync();
        }
    }

    /// Reconciles a backend event with the session.
    ///
    /// Events from superseded loads are dropped. Returns whether the event was
    /// applied.
    pub(crate) fn handle_backend_event(&mut self, event: &BackendEvent) -> bool {
        if !self.backend.apply_event(event) {
            debug!(?event, "Ignoring event from superseded load");
            return false;
        }

        if let BackendEventKind::Failure(message) = &event.kind {
            warn!("{}", PlaybackError::BackendFailure(message.clone()));
        }

        self.resync();
        true
    }

    /// Forgets the loaded entry once the backend has died.
    ///
    /// The current index is kept.
    pub(crate) fn backend_lost(&mut self) {
        if let Some(loaded) = &self.loaded {
            warn!(index = loaded.index, "Backend lost while media was loaded");
        }
        self.backend.lost();
        self.resync();
    }

    /// Appends every path to the playlist. Does not start playback or move the
    /// current index.
    pub(crate) fn open_files<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let before = self.playlist.len();
        for path in paths {
            self.playlist.add(PlaylistEntry::new(path));
        }

        let added = self.playlist.len() - before;
        info!("Added {} entries to the playlist", added);
        added
    }

    pub(crate) fn double_click_row(&mut self, index: usize) -> Result<()> {
        self.playlist.set_current(index)?;
        self.play_index(index)
    }

    pub(crate) fn highlight(&mut self, index: usize) -> Result<()> {
        self.playlist.set_current(index)
    }

    /// Starts the highlighted row when nothing is loaded, otherwise toggles
    /// between playing and paused.
    pub(crate) fn toggle_play_pause(&mut self) -> Result<()> {
        if self.loaded.is_none() || !self.backend.is_loaded() {
            if self.playlist.is_empty() {
                return Err(PlaybackError::EmptyPlaylist);
            }
            let index = self.playlist.current().ok_or(PlaybackError::NothingSelected)?;
            return self.play_index(index);
        }

        match self.backend.state() {
            PlaybackState::Playing => self.backend.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.backend.play(),
        }
    }

    /// Stops and unloads. The current index is kept so that play resumes
    /// from the same entry.
    pub(crate) fn stop(&mut self) -> Result<()> {
        self.loaded = None;
        self.backend.stop()
    }

    pub(crate) fn next(&mut self) -> Result<()> {
        let index = next_index(self.playlist.current(), self.playlist.len())?;
        self.playlist.set_current(index)?;
        self.play_index(index)
    }

    pub(crate) fn previous(&mut self) -> Result<()> {
        let index = previous_index(self.playlist.current(), self.playlist.len())?;
        self.playlist.set_current(index)?;
        self.play_index(index)
    }

    /// Seeks forward by the skip step, or stops if that would pass the end of
    /// the track.
    pub(crate) fn skip_forward(&mut self) -> Result<()> {
        self.require_media()?;

        let position = self.backend.position();
        match skip_forward_target(position.current_ms, position.duration_ms, self.skip_step_ms) {
            Some(target) => self.backend.seek(target),
            None => {
                debug!("Skipped past the end of the track, stopping");
                self.stop()
            }
        }
    }

    /// Seeks back by the skip step, clamping at the start of the track.
    pub(crate) fn skip_back(&mut self) -> Result<()> {
        self.require_media()?;

        let target = skip_back_target(self.backend.position_ms(), self.skip_step_ms);
        self.backend.seek(target)
    }

    /// Seeks to an absolute position, clamped to the track duration when it
    /// is known.
    pub(crate) fn slider_seek(&mut self, position_ms: u64) -> Result<()> {
        self.require_media()?;

        let duration_ms = self.backend.duration_ms();
        let target = if duration_ms > 0 {
            position_ms.min(duration_ms)
        } else {
            position_ms
        };
        self.backend.seek(target)
    }

    /// Sets the session volume. The level survives stops and track changes.
    pub(crate) fn set_volume(&mut self, volume: Volume) -> Result<()> {
        self.volume = volume;
        self.backend.set_volume(volume)
    }

    /// Removes the given rows as one batch, stopping playback first if the
    /// loaded entry is among them.
    ///
    /// An out-of-range index rejects the whole batch before anything is
    /// stopped or removed.
    pub(crate) fn remove_selected(&mut self, indices: &BTreeSet<usize>) -> Result<()> {
        if indices.is_empty() {
            return Ok(());
        }
        self.playlist.check_indices(indices)?;

        let removes_loaded = self
            .loaded_index()
            .is_some_and(|index| indices.contains(&index));

        // Even if the backend refuses to stop, the entry still goes
        let stopped = if removes_loaded { self.stop() } else { Ok(()) };

        self.playlist.remove_at(indices)?;
        if let Some(loaded) = self.loaded.as_mut() {
            // The loaded entry was not removed, so it must still have an index
            if let Some(index) = playlist::reindex_after_removal(loaded.index, indices) {
                loaded.index = index;
            }
        }

        info!("Removed {} entries from the playlist", indices.len());
        stopped
    }

    /// Stops playback and clears the playlist.
    pub(crate) fn remove_all(&mut self) -> Result<()> {
        let stopped = self.stop();
        self.playlist.remove_all();
        info!("Cleared the playlist");
        stopped
    }

    fn play_index(&mut self, index: usize) -> Result<()> {
        let entry = self.playlist.get(index)?.clone();
        info!("Playing {}", entry.path().display());

        let token = self.backend.load(&entry)?;
        self.loaded = Some(LoadedEntry { index, entry, token });

        self.backend.set_volume(self.volume)?;
        self.backend.play()
    }

    fn require_media(&self) -> Result<()> {
        if self.loaded.is_some() && self.backend.is_loaded() {
            Ok(())
        } else {
            Err(PlaybackError::NoMediaLoaded)
        }
    }

    /// Drops the loaded entry if the backend no longer holds that load.
    fn resync(&mut self) {
        let backend_token = self.backend.loaded_token();
        if let Some(loaded) = &self.loaded {
            if backend_token != Some(loaded.token) {
                debug!(index = loaded.index, "Loaded entry no longer held by backend");
                self.loaded = None;
            }
        }
    }
}

/// Index after `current`, wrapping to the start. No current index behaves as
/// if positioned just before the first entry.
pub(crate) fn next_index(current: Option<usize>, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(PlaybackError::EmptyPlaylist);
    }
    Ok(current.map_or(0, |index| (index + 1) % len))
}

/// Index before `current`, wrapping to the end. No current index selects the
/// last entry.
pub(crate) fn previous_index(current: Option<usize>, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(PlaybackError::EmptyPlaylist);
    }
    Ok(match current {
        Some(index) if index > 0 && index < len => index - 1,
        _ => len - 1,
    })
}

/// Seek target for skip forward, or `None` when it would pass the end.
pub(crate) fn skip_forward_target(position_ms: u64, duration_ms: u64, step_ms: u64) -> Option<u64> {
    let target = position_ms.saturating_add(step_ms);
    (target <= duration_ms).then_some(target)
}

pub(crate) fn skip_back_target(position_ms: u64, step_ms: u64) -> u64 {
    position_ms.saturating_sub(step_ms)
}

#[cfg(test)]
mod tests;
