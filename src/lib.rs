// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song list sorting and favorites for a rhythm game's song selection screen.
//!
//! The host game owns the songs and the widgets; this crate decides the
//! ordering, keeps the favorites set, and pushes both back through the
//! adapter traits in [`host`].

pub mod catalog;
pub mod config;
pub mod control;
pub mod error;
pub mod host;
pub mod session;
pub mod sorting;
pub mod ui;

pub use catalog::{Song, SongId};
pub use config::{BrowserSettings, FileSettingsStore, SettingsStore};
pub use error::{BrowserError, Result};
pub use host::{FavoriteLabel, HostBindings, MemoryHost};
pub use session::{EventRouter, HostEvent, Screen, SelectionState, SessionController};
pub use sorting::{order, SortMode};
