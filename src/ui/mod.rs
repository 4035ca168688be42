// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal front end for the song browser.
//!
//! Plays the part of the host game: it owns a [`MemoryHost`], draws its song
//! list and buttons with ratatui, and turns key presses into host events.

mod song_list;

pub use song_list::SongListWidget;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::debug;

use crate::control::{format_shortcut, ControlAction, KeyboardController};
use crate::host::{FavoriteLabel, HostModel, MemoryHost};
use crate::session::{EventRouter, HostEvent, Screen, SessionController};
use crate::sorting::SortMode;

/// Front-end state that is not part of the host model
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Help text visible
    pub show_help: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl UiState {
    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Clear expired status message
    pub fn clear_expired_status(&mut self) {
        if let Some(time) = self.status_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }
}

/// Apply a control action to the host and the router.
///
/// Returns false when the action asks the application to quit.
pub fn apply_action(
    action: ControlAction,
    host: &MemoryHost,
    router: &mut EventRouter,
    state: &mut UiState,
) -> bool {
    match action {
        ControlAction::Quit => return false,
        ControlAction::ToggleHelp => state.show_help = !state.show_help,
        ControlAction::SelectPrevious | ControlAction::SelectNext => {
            let delta = if action == ControlAction::SelectNext { 1 } else { -1 };
            if host.move_selection(delta) {
                router.dispatch(HostEvent::SelectionChanged);
            }
        }
        ControlAction::ToggleScreen => {
            if router.screen() == Screen::SongMenu {
                host.hide_screen();
                router.dispatch(HostEvent::ScreenChanged(Screen::Other));
                state.set_status("Left the song menu (Tab to return)");
            } else {
                host.show_screen();
                router.dispatch(HostEvent::ScreenChanged(Screen::SongMenu));
                state.set_status("Song menu");
            }
        }
        action if action.is_session() => {
            if router.dispatch(HostEvent::Action(action.clone())) {
                if let ControlAction::ToggleFavorite = action {
                    let label = router.controller().label();
                    if label != FavoriteLabel::Unknown {
                        state.set_status(format!("Favorite button: {}", label));
                    }
                } else {
                    state.set_status(format!("Sorted by {}", router.controller().sort_mode()));
                }
            } else {
                state.set_status("Open the song menu first (Tab)");
            }
        }
        other => debug!("Unhandled action {:?}", other),
    }
    true
}

/// Terminal UI application
pub struct App {
    /// Front-end state
    state: UiState,
    /// Terminal handle
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Target frame rate
    frame_rate: u32,
    /// Whether to continue running
    running: bool,
}

impl App {
    /// Create a new app and take over the terminal
    pub fn new() -> io::Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            state: UiState::default(),
            terminal,
            frame_rate: 30,
            running: true,
        })
    }

    /// Set frame rate
    pub fn set_frame_rate(&mut self, fps: u32) {
        self.frame_rate = fps.clamp(1, 120);
    }

    /// Run the event loop until the user quits
    pub fn run(
        &mut self,
        host: &MemoryHost,
        router: &mut EventRouter,
        keyboard: &KeyboardController,
    ) -> io::Result<()> {
        while self.running {
            self.state.clear_expired_status();
            self.draw(host, router.controller(), keyboard)?;

            let Some(Event::Key(key)) = self.poll_event()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(action) = keyboard.process_key(key.code, key.modifiers) {
                self.running = apply_action(action, host, router, &mut self.state);
            }
        }
        Ok(())
    }

    /// Poll for events with timeout
    fn poll_event(&self) -> io::Result<Option<Event>> {
        let timeout = Duration::from_millis(1000 / self.frame_rate as u64);
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Draw the UI
    fn draw(
        &mut self,
        host: &MemoryHost,
        controller: &SessionController,
        keyboard: &KeyboardController,
    ) -> io::Result<()> {
        let model = host.model().clone();
        let state = self.state.clone();

        self.terminal.draw(|frame| {
            let area = frame.area();

            // Main layout: buttons, song list, status bar
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Buttons
                    Constraint::Min(5),    // Songs
                    Constraint::Length(1), // Status bar
                ])
                .split(area);

            render_buttons(frame, chunks[0], &model);

            let title = if model.screen_active {
                format!(" Songs ({}) ", model.songs.len())
            } else {
                " Songs (menu inactive) ".to_string()
            };
            let selected = if model.screen_active { model.selected } else { None };
            let list = SongListWidget::new(&model.songs, &controller.settings().favorites)
                .selected(selected)
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(list, chunks[1]);

            render_status_bar(frame, chunks[2], &state);

            if state.show_help {
                render_help_overlay(frame, area, keyboard);
            }
        })?;

        Ok(())
    }

    /// Cleanup terminal on drop
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Sort buttons with the active one highlighted, then the favorite button
fn button_line(model: &HostModel) -> Line<'static> {
    let mut spans = Vec::new();

    for mode in SortMode::ENABLED {
        let style = if model.active_sort == Some(mode) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("[{}]", mode.label()), style));
        spans.push(Span::raw(" "));
    }

    let favorite_style = match model.favorite_label {
        FavoriteLabel::Favorite => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        FavoriteLabel::NotFavorite => Style::default().fg(Color::Green),
        FavoriteLabel::Unknown => Style::default().fg(Color::DarkGray),
    };
    spans.push(Span::raw("   Favorite "));
    spans.push(Span::styled(format!("[{}]", model.favorite_label.token()), favorite_style));

    Line::from(spans)
}

/// Render the button row
fn render_buttons(frame: &mut Frame, area: Rect, model: &HostModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Song Browser ");

    let content = if model.widgets_ready {
        button_line(model)
    } else {
        Line::from(Span::styled("Buttons not created yet", Style::default().fg(Color::DarkGray)))
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, area: Rect, state: &UiState) {
    let text = if let Some(ref msg) = state.status_message {
        Span::styled(msg, Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            " t: Cycle sort | 1-3: Sort | f: Favorite | n/m: Prev/Next | Tab: Menu | h: Help | q: Quit",
            Style::default().fg(Color::DarkGray),
        )
    };

    frame.render_widget(Paragraph::new(text), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect, keyboard: &KeyboardController) {
    let mut categories: Vec<_> = keyboard.bindings_by_category().into_iter().collect();
    categories.sort_by(|a, b| a.0.cmp(&b.0));

    let mut help_text = Vec::new();
    for (category, mut bindings) in categories {
        bindings.sort_by_key(|b| format_shortcut(&b.shortcut));
        let heading = Style::default().add_modifier(Modifier::BOLD);
        help_text.push(Line::from(Span::styled(category, heading)));
        for binding in bindings {
            help_text.push(Line::from(format!(
                "  {:<10} {}",
                format_shortcut(&binding.shortcut),
                binding.description
            )));
        }
    }

    // Calculate centered area
    let width = 50.min(area.width.saturating_sub(4));
    let height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(4));
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    frame.render_widget(Paragraph::new(help_text).block(block), help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;
    use crate::config::{BrowserSettings, SettingsStore};
    use crate::error::Result;

    struct NullStore;

    impl SettingsStore for NullStore {
        fn load(&self) -> Result<BrowserSettings> {
            Ok(BrowserSettings::default())
        }

        fn save(&mut self, _settings: &BrowserSettings) -> Result<()> {
            Ok(())
        }
    }

    fn setup() -> (MemoryHost, EventRouter) {
        let host = MemoryHost::new(builtin_catalog());
        let controller = SessionController::new(host.bindings(), Box::new(NullStore));
        let mut router = EventRouter::new(controller);
        host.show_screen();
        router.dispatch(HostEvent::ScreenChanged(Screen::SongMenu));
        router.dispatch(HostEvent::CatalogLoaded);
        (host, router)
    }

    #[test]
    fn test_ui_state_status() {
        let mut state = UiState::default();
        assert!(state.status_message.is_none());

        state.set_status("Test message");
        assert_eq!(state.status_message, Some("Test message".to_string()));
    }

    #[test]
    fn test_apply_navigation_and_favorite() {
        let (host, mut router) = setup();
        let mut state = UiState::default();

        assert!(apply_action(ControlAction::SelectNext, &host, &mut router, &mut state));
        let selected = host.selected_song().unwrap();
        assert_eq!(router.controller().selection().song_id(), Some(selected.id()));

        apply_action(ControlAction::ToggleFavorite, &host, &mut router, &mut state);
        assert!(router.controller().settings().is_favorite(selected.id()));
        assert_eq!(host.model().favorite_label, FavoriteLabel::Favorite);
        assert_eq!(state.status_message.as_deref(), Some("Favorite button: -1"));
    }

    #[test]
    fn test_apply_toggle_screen() {
        let (host, mut router) = setup();
        let mut state = UiState::default();

        apply_action(ControlAction::ToggleScreen, &host, &mut router, &mut state);
        assert!(!host.model().screen_active);
        assert_eq!(host.model().favorite_label, FavoriteLabel::Unknown);

        // Session shortcuts are detached outside the menu
        apply_action(ControlAction::CycleSortMode, &host, &mut router, &mut state);
        assert_eq!(router.controller().sort_mode(), SortMode::Default);

        apply_action(ControlAction::ToggleScreen, &host, &mut router, &mut state);
        apply_action(ControlAction::CycleSortMode, &host, &mut router, &mut state);
        assert_eq!(router.controller().sort_mode(), SortMode::Favorites);
        assert_eq!(router.attach_count(), 2);
    }

    #[test]
    fn test_apply_quit() {
        let (host, mut router) = setup();
        let mut state = UiState::default();
        assert!(!apply_action(ControlAction::Quit, &host, &mut router, &mut state));
    }

    #[test]
    fn test_button_line_marks_active_sort() {
        let (host, mut router) = setup();
        router.dispatch(HostEvent::SortClicked(SortMode::Original));

        let line = button_line(&host.model());
        let active: Vec<_> = line
            .spans
            .iter()
            .filter(|s| s.style.fg == Some(Color::Red))
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(active, vec!["[Org]"]);
    }
}
