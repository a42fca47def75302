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

//! Input handling for the playlist view.
//!
//! Navigation keys become [`Intent::Highlight`], so moving the highlight goes
//! through the session like every other change of the current index.

use std::collections::BTreeSet;

use crossterm::event::{Event, KeyCode, KeyModifiers};

use crate::{
    components::PlaylistView,
    model::playlist::Playlist,
    session::{Intent, next_index, previous_index},
};

impl PlaylistView {
    /// Handles a key event, returning the intent it produces, if any.
    pub(crate) fn process_event(&mut self, event: &Event, playlist: &Playlist) -> Option<Intent> {
        let Event::Key(key_event) = event else {
            return None;
        };

        let len = playlist.len();
        let current = playlist.current();

        match (key_event.code, key_event.modifiers) {
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => {
                next_index(current, len).ok().map(Intent::Highlight)
            }
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => {
                previous_index(current, len).ok().map(Intent::Highlight)
            }
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) if len > 0 => Some(Intent::Highlight(0)),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) if len > 0 => {
                Some(Intent::Highlight(len - 1))
            }

            (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.select_all(len);
                None
            }
            (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
                self.select_inverse(len);
                None
            }
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => {
                self.clear_selection();
                None
            }
            (KeyCode::Char(' '), _) => {
                let index = current?;
                self.toggle_selected(index);
                next_index(Some(index), len).ok().map(Intent::Highlight)
            }

            (KeyCode::Enter, _) => current.map(Intent::DoubleClickRow),

            (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => {
                let indices = if self.selection.is_empty() {
                    current.into_iter().collect::<BTreeSet<_>>()
                } else {
                    self.selection.clone()
                };
                (!indices.is_empty()).then_some(Intent::RemoveSelected(indices))
            }
            (KeyCode::Char('D'), _) => Some(Intent::RemoveAll),

            _ => None,
        }
    }
}
