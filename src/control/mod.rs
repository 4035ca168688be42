// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Control system for keyboard input.
//!
//! Maps key presses to song browser actions. Session actions go to the
//! event router; navigation and UI actions stay with the host.

pub mod keyboard;

pub use keyboard::{format_shortcut, KeyBinding, KeyboardController, Shortcut};

use crate::sorting::SortMode;

/// Action that can be triggered by controls
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    // Session
    /// Advance to the next sort mode
    CycleSortMode,
    /// Switch to a specific sort mode
    SetSortMode(SortMode),
    /// Add or remove the selected song from favorites
    ToggleFavorite,

    // Navigation
    /// Move selection up one row
    SelectPrevious,
    /// Move selection down one row
    SelectNext,
    /// Enter or leave the song menu
    ToggleScreen,

    // UI
    /// Toggle help display
    ToggleHelp,
    /// Quit application
    Quit,
}

impl ControlAction {
    /// Check if this action is handled by the session controller
    pub fn is_session(&self) -> bool {
        matches!(
            self,
            ControlAction::CycleSortMode
                | ControlAction::SetSortMode(_)
                | ControlAction::ToggleFavorite
        )
    }
}
