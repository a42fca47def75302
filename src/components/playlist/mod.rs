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

//! Playlist view state.
//!
//! The highlighted row is not owned here: it is the playlist's current index,
//! so next/previous navigation moves the highlight as well. The view only
//! keeps the multi-row selection used by "remove selected" and the scroll
//! state of the table.

mod event;
mod render;

use std::collections::BTreeSet;

use ratatui::widgets::TableState;

pub(crate) struct PlaylistView {
    selection: BTreeSet<usize>,
    table_state: TableState,
}

impl PlaylistView {
    pub(crate) fn new() -> Self {
        Self {
            selection: BTreeSet::new(),
            table_state: TableState::new(),
        }
    }

    pub(crate) fn selection(&self) -> &BTreeSet<usize> {
        &self.selection
    }

    /// Selection indices are positional, so any removal invalidates them.
    pub(crate) fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn toggle_selected(&mut self, index: usize) {
        if !self.selection.insert(index) {
            self.selection.remove(&index);
        }
    }

    fn select_all(&mut self, len: usize) {
        self.selection.extend(0..len);
    }

    fn select_inverse(&mut self, len: usize) {
        for index in 0..len {
            self.toggle_selected(index);
        }
    }
}
