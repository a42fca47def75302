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

//! Position sync loop.
//!
//! The display is re-derived on two kinds of trigger: a fixed-cadence tick
//! from [`spawn_ticker`], and every backend event or user intent processed by
//! the event loop. [`PositionSync`] performs the read-only recomputation and
//! reports a new [`DisplayState`] only when it differs from the last one, so
//! the renderer is notified of changes rather than polled.

use std::{
    sync::mpsc::Sender,
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::trace;

use crate::{
    actions::events::AppEvent,
    display::DisplayState,
    player::MediaBackend,
    session::PlaybackSession,
};

/// Why the display is being recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SyncTrigger {
    Tick,
    Backend,
    Intent,
}

#[derive(Debug, Default)]
pub(crate) struct PositionSync {
    current: DisplayState,
}

impl PositionSync {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The most recently derived display.
    pub(crate) fn current(&self) -> &DisplayState {
        &self.current
    }

    /// Re-derives the display from the session, returning it if it changed.
    ///
    /// This never mutates the session.
    pub(crate) fn refresh<B: MediaBackend>(
        &mut self,
        trigger: SyncTrigger,
        session: &PlaybackSession<B>,
    ) -> Option<&DisplayState> {
        let derived = session.display_state();
        if derived == self.current {
            return None;
        }

        trace!(?trigger, ?derived, "Display changed");
        self.current = derived;
        Some(&self.current)
    }
}

/// Spawns a thread sending [`AppEvent::Tick`] at a fixed interval.
///
/// The thread exits once the event loop has gone away.
pub(crate) fn spawn_ticker(event_tx: Sender<AppEvent>, interval: Duration) -> JoinHandle<()> {
    thread::spawn(move || {
        while event_tx.send(AppEvent::Tick).is_ok() {
            thread::sleep(interval);
        }
    })
}
