// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song list display widget.

use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Paragraph, Widget},
};

use crate::catalog::{Song, SongId};

/// Widget for displaying the host's song list
pub struct SongListWidget<'a> {
    songs: &'a [Song],
    favorites: &'a HashSet<SongId>,
    selected: Option<usize>,
    block: Option<Block<'a>>,
}

impl<'a> SongListWidget<'a> {
    /// Create a new song list widget
    pub fn new(songs: &'a [Song], favorites: &'a HashSet<SongId>) -> Self {
        Self {
            songs,
            favorites,
            selected: None,
            block: None,
        }
    }

    /// Set selected row
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for SongListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if self.songs.is_empty() {
            Paragraph::new("No songs loaded")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }
        if area.height < 2 {
            return;
        }

        render_header(Rect { height: 1, ..area }, buf);

        let rows = (area.height - 1) as usize;
        let offset = scroll_offset(self.selected, rows, self.songs.len());

        let visible = self.songs.iter().enumerate().skip(offset).take(rows);
        for (row, (index, song)) in visible.enumerate() {
            let row_area = Rect {
                y: area.y + 1 + row as u16,
                height: 1,
                ..area
            };
            let is_selected = self.selected == Some(index);
            let is_favorite = self.favorites.contains(song.id());
            render_song_row(row_area, buf, index, song, is_selected, is_favorite);
        }
    }
}

/// First visible row so that `selected` stays on screen
fn scroll_offset(selected: Option<usize>, rows: usize, len: usize) -> usize {
    match selected {
        Some(index) if rows > 0 && index >= rows => {
            (index + 1 - rows).min(len.saturating_sub(rows))
        }
        _ => 0,
    }
}

fn columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(4),  // #
            Constraint::Length(3),  // Favorite
            Constraint::Min(20),    // Title
            Constraint::Length(24), // Author
            Constraint::Length(12), // Id
        ])
        .split(area)
}

/// Render list header row
fn render_header(area: Rect, buf: &mut Buffer) {
    let style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);
    let chunks = columns(area);

    Paragraph::new("#").style(style).render(chunks[0], buf);
    Paragraph::new("★").style(style).render(chunks[1], buf);
    Paragraph::new("Title").style(style).render(chunks[2], buf);
    Paragraph::new("Author").style(style).render(chunks[3], buf);
    Paragraph::new("Id").style(style).render(chunks[4], buf);
}

/// Render a single song row
fn render_song_row(
    area: Rect,
    buf: &mut Buffer,
    index: usize,
    song: &Song,
    selected: bool,
    favorite: bool,
) {
    let base = if selected {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let chunks = columns(area);

    buf.set_style(area, base);

    Paragraph::new(format!("{}", index + 1))
        .style(base.fg(Color::DarkGray))
        .render(chunks[0], buf);

    if favorite {
        Paragraph::new("★")
            .style(base.fg(Color::Yellow))
            .render(chunks[1], buf);
    }

    Paragraph::new(song.title())
        .style(base.fg(Color::White))
        .render(chunks[2], buf);
    Paragraph::new(song.author())
        .style(base.fg(Color::Cyan))
        .render(chunks[3], buf);
    Paragraph::new(song.id().as_str())
        .style(base.fg(Color::DarkGray))
        .render(chunks[4], buf);
}
