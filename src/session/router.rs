// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Host event routing.
//!
//! Listeners for the song menu are attached once when the menu screen
//! becomes active and detached when it goes away, so repeated screen
//! changes never stack duplicate handlers.

use std::collections::HashSet;

use tracing::debug;

use super::SessionController;
use crate::control::ControlAction;
use crate::sorting::SortMode;

/// Host screens the router cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The song selection menu
    SongMenu,
    /// Gameplay, results, or anything else
    Other,
}

/// Lifecycle and input events emitted by the host
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Active screen changed
    ScreenChanged(Screen),
    /// Catalog finished loading
    CatalogLoaded,
    /// User moved the selection
    SelectionChanged,
    /// Favorite button clicked
    FavoriteClicked,
    /// Sort button clicked
    SortClicked(SortMode),
    /// Keyboard shortcut resolved to an action
    Action(ControlAction),
}

/// Handlers bound to the song menu screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    /// Selection changes
    Selection,
    /// Favorite button clicks
    FavoriteButton,
    /// Sort button clicks
    SortButtons,
    /// Keyboard shortcuts
    Keyboard,
}

impl Listener {
    /// Every listener attached with the song menu
    pub const MENU: [Listener; 4] = [
        Listener::Selection,
        Listener::FavoriteButton,
        Listener::SortButtons,
        Listener::Keyboard,
    ];
}

/// Routes host events to a [`SessionController`]
pub struct EventRouter {
    controller: SessionController,
    attached: HashSet<Listener>,
    screen: Screen,
    attach_count: usize,
}

impl EventRouter {
    /// Create a router; no menu listeners are attached yet
    pub fn new(controller: SessionController) -> Self {
        Self {
            controller,
            attached: HashSet::new(),
            screen: Screen::Other,
            attach_count: 0,
        }
    }

    /// Get the controller
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Get the controller mutably
    pub fn controller_mut(&mut self) -> &mut SessionController {
        &mut self.controller
    }

    /// Current screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Whether a listener is attached
    pub fn is_attached(&self, listener: Listener) -> bool {
        self.attached.contains(&listener)
    }

    /// Number of times the menu listeners have been attached
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    /// Route one event. Returns true if the session handled it.
    pub fn dispatch(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::ScreenChanged(screen) => {
                self.change_screen(screen);
                true
            }
            HostEvent::CatalogLoaded => {
                self.controller.on_catalog_loaded();
                true
            }
            HostEvent::SelectionChanged => self.when_attached(Listener::Selection, |c| {
                c.on_selection_changed();
            }),
            HostEvent::FavoriteClicked => self.when_attached(Listener::FavoriteButton, |c| {
                c.toggle_favorite();
            }),
            HostEvent::SortClicked(mode) => self.when_attached(Listener::SortButtons, |c| {
                c.on_sort_mode_changed(mode);
            }),
            HostEvent::Action(action) => self.dispatch_action(action),
        }
    }

    fn dispatch_action(&mut self, action: ControlAction) -> bool {
        match action {
            ControlAction::CycleSortMode => self.when_attached(Listener::Keyboard, |c| {
                c.cycle_sort_mode();
            }),
            ControlAction::SetSortMode(mode) => self.when_attached(Listener::Keyboard, |c| {
                c.on_sort_mode_changed(mode);
            }),
            ControlAction::ToggleFavorite => self.when_attached(Listener::Keyboard, |c| {
                c.toggle_favorite();
            }),
            // Navigation, help and quit belong to the host
            _ => false,
        }
    }

    fn change_screen(&mut self, screen: Screen) {
        debug!("Active screen changed to {:?}", screen);
        let previous = self.screen;
        self.screen = screen;

        match screen {
            Screen::SongMenu => {
                if self.attached.is_empty() {
                    self.attached.extend(Listener::MENU);
                    self.attach_count += 1;
                    debug!("Attached song menu listeners");
                } else {
                    debug!("Song menu listeners already attached");
                }
                self.controller.on_screen_activated();
            }
            Screen::Other => {
                if !self.attached.is_empty() {
                    self.attached.clear();
                    debug!("Detached song menu listeners");
                }
                if previous == Screen::SongMenu {
                    self.controller.on_screen_deactivated();
                }
            }
        }
    }

    fn when_attached<F>(&mut self, listener: Listener, handler: F) -> bool
    where
        F: FnOnce(&mut SessionController),
    {
        if !self.is_attached(listener) {
            debug!("Ignoring event for detached {:?} listener", listener);
            return false;
        }
        handler(&mut self.controller);
        true
    }
}
