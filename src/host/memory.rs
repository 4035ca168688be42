// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! In-process host model.
//!
//! Backs the terminal front end and the tests. Enforces the host contract:
//! replacements must be permutations, and widgets refuse updates until the
//! selection screen has been built.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use tracing::debug;

use super::{
    FavoriteLabel, HostBindings, HostCatalog, HostFavoriteWidget, HostSelection, HostSortWidgets,
};
use crate::catalog::{is_permutation, Song, SongId};
use crate::error::{BrowserError, Result};
use crate::sorting::SortMode;

/// State owned by the host
#[derive(Debug, Clone, Default)]
pub struct HostModel {
    /// Songs in display order
    pub songs: Vec<Song>,
    /// Raw selected row; may be out of range
    pub selected: Option<usize>,
    /// Song selection screen is showing
    pub screen_active: bool,
    /// Favorite and sort buttons have been created
    pub widgets_ready: bool,
    /// Favorite button label as last set
    pub favorite_label: FavoriteLabel,
    /// Sort button currently highlighted
    pub active_sort: Option<SortMode>,
    /// Number of accepted catalog replacements
    pub replace_count: usize,
}

/// Shared handle to a [`HostModel`]
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    model: Rc<RefCell<HostModel>>,
}

impl MemoryHost {
    /// Create a host holding `songs`, with the selection screen not yet shown
    pub fn new(songs: Vec<Song>) -> Self {
        Self {
            model: Rc::new(RefCell::new(HostModel {
                songs,
                ..Default::default()
            })),
        }
    }

    /// Boxed handles for the session controller, all sharing this model
    pub fn bindings(&self) -> HostBindings {
        HostBindings {
            catalog: Box::new(self.clone()),
            selection: Box::new(self.clone()),
            favorite_button: Box::new(self.clone()),
            sort_buttons: Box::new(self.clone()),
        }
    }

    /// Borrow the model
    pub fn model(&self) -> Ref<'_, HostModel> {
        self.model.borrow()
    }

    /// Borrow the model mutably
    pub fn model_mut(&self) -> RefMut<'_, HostModel> {
        self.model.borrow_mut()
    }

    /// Show the selection screen: builds the widgets and selects the first row
    pub fn show_screen(&self) {
        let mut model = self.model_mut();
        model.screen_active = true;
        model.widgets_ready = true;
        if model.selected.is_none() && !model.songs.is_empty() {
            model.selected = Some(0);
        }
    }

    /// Leave the selection screen; widgets stay built
    pub fn hide_screen(&self) {
        self.model_mut().screen_active = false;
    }

    /// Move the selection by `delta` rows, clamped to the list.
    ///
    /// Returns true if the selection changed.
    pub fn move_selection(&self, delta: isize) -> bool {
        let mut model = self.model.borrow_mut();
        if !model.screen_active || model.songs.is_empty() {
            return false;
        }
        let last = model.songs.len() - 1;
        let current = model.selected.unwrap_or(0).min(last);
        let next = current.saturating_add_signed(delta).min(last);
        if model.selected == Some(next) {
            return false;
        }
        model.selected = Some(next);
        true
    }

    /// Selected song, resolved against the current list
    pub fn selected_song(&self) -> Option<Song> {
        let model = self.model.borrow();
        model.selected.and_then(|i| model.songs.get(i)).cloned()
    }

    fn read(&self) -> Result<Ref<'_, HostModel>> {
        self.model
            .try_borrow()
            .map_err(|_| BrowserError::HostNotReady("host model is busy".to_string()))
    }

    fn write(&self) -> Result<RefMut<'_, HostModel>> {
        self.model
            .try_borrow_mut()
            .map_err(|_| BrowserError::HostNotReady("host model is busy".to_string()))
    }

    fn widgets(&self) -> Result<RefMut<'_, HostModel>> {
        let model = self.write()?;
        if !model.widgets_ready {
            return Err(BrowserError::HostNotReady(
                "song browser buttons not created yet".to_string(),
            ));
        }
        Ok(model)
    }
}

impl HostCatalog for MemoryHost {
    fn snapshot(&self) -> Result<Vec<Song>> {
        Ok(self.read()?.songs.clone())
    }

    fn replace(&mut self, songs: Vec<Song>) -> Result<()> {
        let mut model = self.write()?;
        if !is_permutation(&model.songs, &songs) {
            return Err(BrowserError::NotAPermutation(format!(
                "expected {} songs with the current ids, got {}",
                model.songs.len(),
                songs.len()
            )));
        }
        model.songs = songs;
        model.replace_count += 1;
        debug!("Host adopted new ordering of {} songs", model.songs.len());
        Ok(())
    }
}

impl HostSelection for MemoryHost {
    fn is_screen_active(&self) -> bool {
        // A busy model is not known to be inactive. Report active so that
        // `current` fails with HostNotReady and callers keep their cached
        // selection instead of clearing it.
        self.read().map(|m| m.screen_active).unwrap_or(true)
    }

    fn current(&self) -> Result<Option<SongId>> {
        let model = self.read()?;
        if !model.screen_active {
            return Ok(None);
        }
        Ok(model
            .selected
            .and_then(|i| model.songs.get(i))
            .map(|s| s.id().clone()))
    }

    fn select(&mut self, index: usize) -> Result<()> {
        let mut model = self.write()?;
        if !model.screen_active {
            return Err(BrowserError::InvalidSelection(
                "selection screen is not active".to_string(),
            ));
        }
        if index >= model.songs.len() {
            return Err(BrowserError::InvalidSelection(format!(
                "row {} out of range ({} songs)",
                index,
                model.songs.len()
            )));
        }
        model.selected = Some(index);
        Ok(())
    }
}

impl HostFavoriteWidget for MemoryHost {
    fn set_label(&mut self, label: FavoriteLabel) -> Result<()> {
        self.widgets()?.favorite_label = label;
        Ok(())
    }
}

impl HostSortWidgets for MemoryHost {
    fn set_active(&mut self, mode: SortMode) -> Result<()> {
        self.widgets()?.active_sort = Some(mode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> MemoryHost {
        MemoryHost::new(vec![
            Song::new("a", "A", "X"),
            Song::new("b", "B", "X"),
            Song::new("c", "C", "X"),
        ])
    }

    #[test]
    fn test_replace_accepts_permutation() {
        let mut host = host();
        let mut songs = host.snapshot().unwrap();
        songs.reverse();

        host.replace(songs).unwrap();
        assert_eq!(host.model().songs[0].id().as_str(), "c");
        assert_eq!(host.model().replace_count, 1);
    }

    #[test]
    fn test_replace_rejects_missing_element() {
        let mut host = host();
        let mut songs = host.snapshot().unwrap();
        songs.pop();

        let err = host.replace(songs).unwrap_err();
        assert!(matches!(err, BrowserError::NotAPermutation(_)));
        assert_eq!(host.model().songs.len(), 3);
        assert_eq!(host.model().replace_count, 0);
    }

    #[test]
    fn test_selection_requires_active_screen() {
        let mut host = host();
        assert!(!host.is_screen_active());
        assert_eq!(host.current().unwrap(), None);
        assert!(host.select(0).is_err());

        host.show_screen();
        assert_eq!(host.current().unwrap(), Some(SongId::from("a")));

        host.select(2).unwrap();
        assert_eq!(host.current().unwrap(), Some(SongId::from("c")));
        assert!(matches!(host.select(3), Err(BrowserError::InvalidSelection(_))));
    }

    #[test]
    fn test_out_of_range_selection_is_none() {
        let host = host();
        host.show_screen();
        host.model_mut().selected = Some(42);
        assert_eq!(host.current().unwrap(), None);
    }

    #[test]
    fn test_move_selection_clamps() {
        let host = host();
        assert!(!host.move_selection(1));

        host.show_screen();
        assert!(host.move_selection(1));
        assert!(host.move_selection(5));
        assert_eq!(host.selected_song().unwrap().id().as_str(), "c");
        assert!(!host.move_selection(1));
        assert!(host.move_selection(-10));
        assert_eq!(host.model().selected, Some(0));
    }

    #[test]
    fn test_widgets_not_ready() {
        let mut host = host();
        assert!(matches!(
            host.set_label(FavoriteLabel::Favorite),
            Err(BrowserError::HostNotReady(_))
        ));
        assert!(host.set_active(SortMode::Original).is_err());

        host.show_screen();
        host.set_label(FavoriteLabel::Favorite).unwrap();
        host.set_active(SortMode::Original).unwrap();
        assert_eq!(host.model().favorite_label, FavoriteLabel::Favorite);
        assert_eq!(host.model().active_sort, Some(SortMode::Original));
    }

    #[test]
    fn test_busy_model_reports_not_ready() {
        let host = host();
        let _guard = host.model_mut();
        assert!(matches!(host.snapshot(), Err(BrowserError::HostNotReady(_))));

        assert!(host.is_screen_active());
        assert!(matches!(host.current(), Err(BrowserError::HostNotReady(_))));
    }
}
