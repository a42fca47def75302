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

//! Playlist store.
//!
//! An ordered list of [`PlaylistEntry`] values together with an optional
//! "current index". Insertion order is preserved and duplicates are allowed.
//! The current index, when set, always refers to a valid entry: removals
//! either shift it to follow its entry or clear it when its entry goes away.
//!
//! Removing entries has no playback side effects, the session is responsible
//! for stopping playback before it removes the loaded entry.

use std::collections::BTreeSet;

use crate::{
    error::{PlaybackError, Result},
    model::PlaylistEntry,
};

#[derive(Debug, Default)]
pub(crate) struct Playlist {
    entries: Vec<PlaylistEntry>,
    current: Option<usize>,
}

impl Playlist {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, entry: PlaylistEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn get(&self, index: usize) -> Result<&PlaylistEntry> {
        self.entries.get(index).ok_or(PlaybackError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub(crate) fn current(&self) -> Option<usize> {
        self.current
    }

    pub(crate) fn set_current(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.current = Some(index);
        Ok(())
    }

    /// Fails with [`PlaybackError::OutOfRange`] on the first index (in
    /// ascending order) that does not address an entry.
    pub(crate) fn check_indices(&self, indices: &BTreeSet<usize>) -> Result<()> {
        indices.iter().try_for_each(|&index| self.check_index(index))
    }

    /// Removes the entries at the given indices as a single batch.
    ///
    /// The whole batch is validated first, so an out-of-range index leaves the
    /// playlist untouched. Entries are removed highest index first and are
    /// returned in that order.
    pub(crate) fn remove_at(&mut self, indices: &BTreeSet<usize>) -> Result<Vec<PlaylistEntry>> {
        self.check_indices(indices)?;

        let removed = indices
            .iter()
            .rev()
            .map(|&index| self.entries.remove(index))
            .collect();

        self.current = self
            .current
            .and_then(|current| reindex_after_removal(current, indices));

        Ok(removed)
    }

    /// Clears every entry and the current index.
    pub(crate) fn remove_all(&mut self) {
        self.entries.clear();
        self.current = None;
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(PlaybackError::OutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}

/// Maps an index from before a batch removal to the index of the same entry
/// afterwards, or `None` if that entry was itself removed.
pub(crate) fn reindex_after_removal(index: usize, removed: &BTreeSet<usize>) -> Option<usize> {
    if removed.contains(&index) {
        None
    } else {
        Some(index - removed.range(..index).count())
    }
}
