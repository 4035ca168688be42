// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Host integration contract.
//!
//! The host owns the song catalog, the selection and the widgets. These traits
//! are the only way the session controller touches them; every call may fail
//! with [`BrowserError::HostNotReady`](crate::error::BrowserError) when the
//! host UI is not in the expected lifecycle state.

pub mod memory;

pub use memory::{HostModel, MemoryHost};

use std::fmt;

use crate::catalog::{Song, SongId};
use crate::error::Result;
use crate::sorting::SortMode;

/// Read and replace the host's song list
pub trait HostCatalog {
    /// Current full catalog, in display order
    fn snapshot(&self) -> Result<Vec<Song>>;

    /// Swap the displayed ordering. `songs` must be a permutation of the current catalog.
    fn replace(&mut self, songs: Vec<Song>) -> Result<()>;
}

/// Query and drive the host's song selection
pub trait HostSelection {
    /// Whether the song selection screen is active
    fn is_screen_active(&self) -> bool;

    /// Currently selected song; `None` for no selection or an out-of-range index
    fn current(&self) -> Result<Option<SongId>>;

    /// Select a row in the song list
    fn select(&mut self, index: usize) -> Result<()>;
}

/// The add/remove favorite button
pub trait HostFavoriteWidget {
    /// Set the button label
    fn set_label(&mut self, label: FavoriteLabel) -> Result<()>;
}

/// One button per enabled sort mode
pub trait HostSortWidgets {
    /// Mark `mode` as the active button and clear every other one
    fn set_active(&mut self, mode: SortMode) -> Result<()>;
}

/// Favorite button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteLabel {
    /// Selected song is a favorite; clicking removes it
    Favorite,
    /// Selected song is not a favorite; clicking adds it
    NotFavorite,
    /// No song selected
    #[default]
    Unknown,
}

impl FavoriteLabel {
    /// Label for a known favorite state
    pub fn for_state(is_favorite: bool) -> Self {
        if is_favorite {
            FavoriteLabel::Favorite
        } else {
            FavoriteLabel::NotFavorite
        }
    }

    /// Short token shown on the button
    pub fn token(&self) -> &'static str {
        match self {
            FavoriteLabel::Favorite => "-1",
            FavoriteLabel::NotFavorite => "+1",
            FavoriteLabel::Unknown => "0",
        }
    }
}

impl fmt::Display for FavoriteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Host handles injected into the session controller
pub struct HostBindings {
    /// Song list
    pub catalog: Box<dyn HostCatalog>,
    /// Selection state
    pub selection: Box<dyn HostSelection>,
    /// Favorite button
    pub favorite_button: Box<dyn HostFavoriteWidget>,
    /// Sort buttons
    pub sort_buttons: Box<dyn HostSortWidgets>,
}
