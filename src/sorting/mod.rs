// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song ordering policies.
//!
//! [`order`] is a pure function from a catalog snapshot, a sort mode and the
//! favorites set to a new ordering of the same songs. It never mutates its
//! inputs and always returns a permutation of the catalog.

mod original;

pub use original::{original_rank, ORIGINAL_RANKS};

use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Song, SongId};
use crate::error::BrowserError;

/// Active ordering policy for the song list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SortMode {
    /// Author, then title
    #[default]
    Default,
    /// Favorites first, then title
    Favorites,
    /// The game's own level order
    Original,
    /// Newest first. Disabled: never offered to the user
    Newest,
}

impl SortMode {
    /// Modes offered as sort buttons, in button order
    pub const ENABLED: [SortMode; 3] = [SortMode::Favorites, SortMode::Default, SortMode::Original];

    /// Whether the mode can be selected
    pub fn is_enabled(&self) -> bool {
        !matches!(self, SortMode::Newest)
    }

    /// Short button label
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Default => "Def",
            SortMode::Favorites => "Fav",
            SortMode::Original => "Org",
            SortMode::Newest => "New",
        }
    }

    /// Next mode for the cycle shortcut: Favorites -> Original -> Default -> Favorites
    pub fn cycle(&self) -> SortMode {
        match self {
            SortMode::Favorites => SortMode::Original,
            SortMode::Original => SortMode::Default,
            SortMode::Default | SortMode::Newest => SortMode::Favorites,
        }
    }

    /// Replace a disabled mode with the default one
    pub fn normalized(self) -> SortMode {
        if self.is_enabled() {
            self
        } else {
            SortMode::Default
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::Default => "default",
            SortMode::Favorites => "favorites",
            SortMode::Original => "original",
            SortMode::Newest => "newest",
        };
        f.write_str(name)
    }
}

impl FromStr for SortMode {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "def" => Ok(SortMode::Default),
            "favorites" | "favourites" | "fav" => Ok(SortMode::Favorites),
            "original" | "org" => Ok(SortMode::Original),
            "newest" | "new" => Ok(SortMode::Newest),
            _ => Err(BrowserError::UnknownSortMode(s.to_string())),
        }
    }
}

/// Persisted names are read with the same leniency as typed ones
impl TryFrom<String> for SortMode {
    type Error = BrowserError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Order a catalog snapshot according to `mode`.
///
/// The result is always a permutation of `catalog`. Songs with identical sort
/// keys are ordered by id, so the output does not depend on input order.
pub fn order(catalog: &[Song], mode: SortMode, favorites: &HashSet<SongId>) -> Vec<Song> {
    let mut songs = catalog.to_vec();

    match mode {
        SortMode::Favorites => {
            debug!("Sorting {} songs as favorites", songs.len());
            songs.sort_by(|a, b| {
                // false sorts before true, so favorites come first
                let a_rest = !favorites.contains(a.id());
                let b_rest = !favorites.contains(b.id());
                a_rest
                    .cmp(&b_rest)
                    .then_with(|| by_title(a, b))
            });
        }
        SortMode::Original => {
            debug!("Sorting {} songs as original", songs.len());
            songs.sort_by(|a, b| {
                Reverse(original_rank(a.id()))
                    .cmp(&Reverse(original_rank(b.id())))
                    .then_with(|| by_title(a, b))
            });
        }
        SortMode::Default | SortMode::Newest => {
            if mode == SortMode::Newest {
                debug!("Newest sort is disabled, falling back to default");
            }
            debug!("Sorting {} songs as default", songs.len());
            songs.sort_by(|a, b| {
                a.author()
                    .cmp(b.author())
                    .then_with(|| by_title(a, b))
            });
        }
    }

    songs
}

/// Title ascending, id as the final tie-break
fn by_title(a: &Song, b: &Song) -> Ordering {
    a.title().cmp(b.title()).then_with(|| a.id().cmp(b.id()))
}
