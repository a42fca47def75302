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

//! UI rendering logic for the playlist view.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table},
};

use crate::{
    components::PlaylistView, model::playlist::Playlist, render::icons::ICON_PLAY, theme::Theme,
};

impl PlaylistView {
    /// Draws the playlist header and table.
    ///
    /// # Arguments
    ///
    /// * `loaded` - Index of the entry loaded into the backend, marked in the
    ///   table.
    pub(crate) fn draw(
        &mut self,
        f: &mut Frame,
        area: Rect,
        playlist: &Playlist,
        loaded: Option<usize>,
        theme: &Theme,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        let header_block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border_colour))
            .padding(Padding::horizontal(1));

        let mut header_text = format!("Playlist | {} files", playlist.len());
        if !self.selection.is_empty() {
            header_text.push_str(&format!(" | {} selected", self.selection.len()));
        }

        f.render_widget(Paragraph::new(header_text).block(header_block), chunks[0]);

        let rows = playlist.entries().iter().enumerate().map(|(index, entry)| {
            let selection_indicator = if self.selection.contains(&index) {
                Line::from("+").style(Style::default().fg(Color::Black).bg(theme.accent_colour))
            } else {
                Line::from("")
            };

            let loaded_indicator = if loaded == Some(index) { ICON_PLAY } else { "" };

            let folder = entry
                .path()
                .parent()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default();

            Row::new(vec![
                Cell::from(selection_indicator),
                Cell::from(Line::from(loaded_indicator).style(Style::default().fg(theme.accent_colour))),
                Cell::from(
                    Line::from(format!("{}", index + 1))
                        .style(Style::default().fg(theme.table_index_fg))
                        .alignment(Alignment::Right),
                ),
                Cell::from(""),
                Cell::from(Line::from(entry.display_name()).style(Style::default().fg(theme.table_name_fg))),
                Cell::from(Line::from(folder).style(Style::default().fg(theme.table_folder_fg))),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Percentage(50),
                Constraint::Percentage(50),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from(""),
                Cell::from(Line::from("#").alignment(Alignment::Right)),
                Cell::from(""),
                Cell::from("File"),
                Cell::from("Folder"),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD).fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .block(Block::default().padding(Padding::horizontal(1)));

        self.table_state.select(playlist.current());
        f.render_stateful_widget(table, chunks[1], &mut self.table_state);
    }
}
