// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Session controller.
//!
//! Owns the persisted settings and the cached selection, reacts to host
//! lifecycle events, and pushes new orderings and button state back into the
//! host. No handler returns an error: host and persistence failures are
//! logged and the handler carries on with the dependent step skipped.

pub mod router;

pub use router::{EventRouter, HostEvent, Listener, Screen};

use tracing::{debug, error, info, warn};

use crate::catalog::{Song, SongId};
use crate::config::{BrowserSettings, SettingsStore};
use crate::error::Result;
use crate::host::{FavoriteLabel, HostBindings};
use crate::sorting::{self, SortMode};

/// Cached view of the host's selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Screen inactive, nothing highlighted, or index out of range
    #[default]
    NoSelection,
    /// A song is highlighted
    SongSelected(SongId),
}

impl SelectionState {
    /// Get the selected song id, if any
    pub fn song_id(&self) -> Option<&SongId> {
        match self {
            SelectionState::NoSelection => None,
            SelectionState::SongSelected(id) => Some(id),
        }
    }
}

/// Mediates between host events and the ordering policies
pub struct SessionController {
    host: HostBindings,
    store: Box<dyn SettingsStore>,
    settings: BrowserSettings,
    selection: SelectionState,
    label: FavoriteLabel,
}

impl SessionController {
    /// Create a controller, loading settings from `store`.
    ///
    /// Unreadable settings fall back to defaults. The store decides what
    /// happens to the unreadable copy on the next save.
    pub fn new(host: HostBindings, store: Box<dyn SettingsStore>) -> Self {
        let settings = match store.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{}; using default settings", e);
                BrowserSettings::default()
            }
        };
        Self::with_settings(host, store, settings)
    }

    /// Create a controller with already-loaded settings
    pub fn with_settings(
        host: HostBindings,
        store: Box<dyn SettingsStore>,
        settings: BrowserSettings,
    ) -> Self {
        debug!(
            "Session starting with sort mode {} and {} favorites",
            settings.sort_mode,
            settings.favorites.len()
        );
        Self {
            host,
            store,
            settings,
            selection: SelectionState::NoSelection,
            label: FavoriteLabel::Unknown,
        }
    }

    /// Get current settings
    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    /// Get active sort mode
    pub fn sort_mode(&self) -> SortMode {
        self.settings.sort_mode
    }

    /// Get cached selection
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Get the favorite label last shown on the button
    pub fn label(&self) -> FavoriteLabel {
        self.label
    }

    /// The host catalog finished loading: sort it and refresh the favorite button
    pub fn on_catalog_loaded(&mut self) {
        debug!("Catalog loaded");
        let Some(ordered) = self.apply_ordering() else {
            return;
        };
        self.select_first();

        match self.read_selection() {
            Ok(SelectionState::NoSelection) => {
                // Screen not up yet: describe whatever is now first
                self.selection = SelectionState::NoSelection;
                let label = match ordered.first() {
                    Some(song) => FavoriteLabel::for_state(self.settings.is_favorite(song.id())),
                    None => FavoriteLabel::Unknown,
                };
                self.show_label(label);
            }
            Ok(state) => self.adopt_selection(state),
            Err(e) => warn!("Could not read selection after catalog load: {}", e),
        }
    }

    /// The selection screen became active: rebuild button state
    pub fn on_screen_activated(&mut self) {
        debug!("Selection screen activated");
        self.refresh_sort_buttons();
        self.refresh_selection();
    }

    /// The selection screen went away
    pub fn on_screen_deactivated(&mut self) {
        debug!("Selection screen deactivated");
        self.selection = SelectionState::NoSelection;
        self.show_label(FavoriteLabel::Unknown);
    }

    /// The user picked a sort mode
    pub fn on_sort_mode_changed(&mut self, mode: SortMode) {
        if !mode.is_enabled() {
            warn!("Sort mode {} is disabled, ignoring", mode);
            return;
        }

        info!("Sort mode changed to {}", mode);
        self.settings.sort_mode = mode;
        self.persist();

        if self.apply_ordering().is_some() {
            self.select_first();
        }
        self.refresh_selection();
        self.refresh_sort_buttons();
    }

    /// Advance to the next sort mode in the cycle
    pub fn cycle_sort_mode(&mut self) {
        let next = self.settings.sort_mode.cycle();
        self.on_sort_mode_changed(next);
    }

    /// The host reports a different selection (or none)
    pub fn on_selection_changed(&mut self) {
        self.refresh_selection();
    }

    /// Add or remove the selected song from favorites.
    ///
    /// Returns the new favorite state, or `None` when nothing is selected.
    pub fn toggle_favorite(&mut self) -> Option<bool> {
        let state = match self.read_selection() {
            Ok(state) => state,
            Err(e) => {
                warn!("Cannot toggle favorite: {}", e);
                return None;
            }
        };
        self.selection = state;

        let Some(id) = self.selection.song_id().cloned() else {
            debug!("No song selected, nothing to toggle");
            self.show_label(FavoriteLabel::Unknown);
            return None;
        };

        let is_favorite = self.settings.toggle_favorite(&id);
        if is_favorite {
            info!("Add {} to favorites", id);
        } else {
            info!("Remove {} from favorites", id);
        }
        self.persist();
        self.show_label(FavoriteLabel::for_state(is_favorite));

        // Only the favorites ordering depends on membership
        if self.settings.sort_mode == SortMode::Favorites {
            if let Some(ordered) = self.apply_ordering() {
                self.reselect(&ordered, &id);
            }
        }

        Some(is_favorite)
    }

    /// Snapshot, order and push back. Returns the new order if the host took it.
    fn apply_ordering(&mut self) -> Option<Vec<Song>> {
        let catalog = match self.host.catalog.snapshot() {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Could not read song list: {}", e);
                return None;
            }
        };

        let ordered = sorting::order(&catalog, self.settings.sort_mode, &self.settings.favorites);
        if let Err(e) = self.host.catalog.replace(ordered.clone()) {
            warn!("Could not replace song list: {}", e);
            return None;
        }

        debug!("Song list reordered as {} ({} songs)", self.settings.sort_mode, ordered.len());
        Some(ordered)
    }

    /// Put the cursor back on row 0 after a reorder
    fn select_first(&mut self) {
        if !self.host.selection.is_screen_active() {
            return;
        }
        if let Err(e) = self.host.selection.select(0) {
            debug!("Could not select first song: {}", e);
        }
    }

    /// Keep the cursor on `id` after it moved in the list
    fn reselect(&mut self, ordered: &[Song], id: &SongId) {
        if !self.host.selection.is_screen_active() {
            return;
        }
        if let Some(index) = ordered.iter().position(|s| s.id() == id) {
            if let Err(e) = self.host.selection.select(index) {
                debug!("Could not reselect {}: {}", id, e);
            }
        }
    }

    fn read_selection(&self) -> Result<SelectionState> {
        if !self.host.selection.is_screen_active() {
            return Ok(SelectionState::NoSelection);
        }
        Ok(match self.host.selection.current()? {
            Some(id) => SelectionState::SongSelected(id),
            None => SelectionState::NoSelection,
        })
    }

    fn refresh_selection(&mut self) {
        match self.read_selection() {
            Ok(state) => self.adopt_selection(state),
            Err(e) => warn!("Could not read selection: {}", e),
        }
    }

    fn adopt_selection(&mut self, state: SelectionState) {
        let label = match state.song_id() {
            Some(id) => FavoriteLabel::for_state(self.settings.is_favorite(id)),
            None => {
                debug!("No song selected");
                FavoriteLabel::Unknown
            }
        };
        self.selection = state;
        self.show_label(label);
    }

    fn show_label(&mut self, label: FavoriteLabel) {
        match self.host.favorite_button.set_label(label) {
            Ok(()) => self.label = label,
            Err(e) => debug!("Favorite button not updated: {}", e),
        }
    }

    fn refresh_sort_buttons(&mut self) {
        if let Err(e) = self.host.sort_buttons.set_active(self.settings.sort_mode) {
            debug!("Sort buttons not updated: {}", e);
        }
    }

    /// Save settings; a failed write keeps the in-memory change
    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.settings) {
            error!("{}; change kept for this session only", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrowserError;
    use crate::host::MemoryHost;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// Settings store that records saves and can be told to fail
    #[derive(Clone, Default)]
    struct RecordingStore {
        initial: BrowserSettings,
        saved: Rc<RefCell<Vec<BrowserSettings>>>,
        fail: Rc<RefCell<bool>>,
    }

    impl SettingsStore for RecordingStore {
        fn load(&self) -> Result<BrowserSettings> {
            Ok(self.initial.clone())
        }

        fn save(&mut self, settings: &BrowserSettings) -> Result<()> {
            if *self.fail.borrow() {
                return Err(BrowserError::ConfigPersistence {
                    path: PathBuf::from("settings.yaml"),
                    reason: "read-only".to_string(),
                });
            }
            self.saved.borrow_mut().push(settings.clone());
            Ok(())
        }
    }

    struct BrokenSelection;

    impl crate::host::HostSelection for BrokenSelection {
        fn is_screen_active(&self) -> bool {
            true
        }

        fn current(&self) -> Result<Option<SongId>> {
            Err(BrowserError::HostNotReady("song list view missing".to_string()))
        }

        fn select(&mut self, _index: usize) -> Result<()> {
            Err(BrowserError::HostNotReady("song list view missing".to_string()))
        }
    }

    fn catalog() -> Vec<Song> {
        vec![
            Song::new("Level3", "Z", "B"),
            Song::new("Level1", "Y", "A"),
            Song::new("Level4", "X", "C"),
        ]
    }

    fn setup(mode: SortMode) -> (SessionController, MemoryHost, RecordingStore) {
        let host = MemoryHost::new(catalog());
        let mut store = RecordingStore::default();
        store.initial.sort_mode = mode;
        let controller = SessionController::new(host.bindings(), Box::new(store.clone()));
        (controller, host, store)
    }

    fn host_ids(host: &MemoryHost) -> Vec<String> {
        host.model().songs.iter().map(|s| s.id().to_string()).collect()
    }

    #[test]
    fn test_catalog_loaded_sorts_host() {
        let (mut controller, host, _) = setup(SortMode::Default);
        controller.on_catalog_loaded();

        assert_eq!(host_ids(&host), vec!["Level1", "Level3", "Level4"]);
        assert_eq!(host.model().replace_count, 1);
    }

    #[test]
    fn test_catalog_loaded_before_screen() {
        // Widgets do not exist yet, so the label cannot be shown
        let (mut controller, host, _) = setup(SortMode::Original);
        controller.on_catalog_loaded();

        assert_eq!(host_ids(&host), vec!["Level4", "Level1", "Level3"]);
        assert_eq!(controller.selection(), &SelectionState::NoSelection);
        assert_eq!(controller.label(), FavoriteLabel::Unknown);
    }

    #[test]
    fn test_catalog_loaded_with_screen_selects_first() {
        let (mut controller, host, _) = setup(SortMode::Default);
        host.show_screen();
        host.model_mut().selected = Some(2);

        controller.on_catalog_loaded();
        assert_eq!(host.model().selected, Some(0));
        assert_eq!(
            controller.selection(),
            &SelectionState::SongSelected(SongId::from("Level1"))
        );
        assert_eq!(controller.label(), FavoriteLabel::NotFavorite);
    }

    #[test]
    fn test_screen_activation_marks_sort_button() {
        let (mut controller, host, _) = setup(SortMode::Original);
        host.show_screen();
        controller.on_screen_activated();

        assert_eq!(host.model().active_sort, Some(SortMode::Original));
        assert_eq!(host.model().favorite_label, FavoriteLabel::NotFavorite);
    }

    #[test]
    fn test_sort_mode_change_persists_and_reorders() {
        let (mut controller, host, store) = setup(SortMode::Default);
        host.show_screen();
        controller.on_catalog_loaded();

        controller.on_sort_mode_changed(SortMode::Original);
        assert_eq!(controller.sort_mode(), SortMode::Original);
        assert_eq!(host_ids(&host), vec!["Level4", "Level1", "Level3"]);
        assert_eq!(host.model().active_sort, Some(SortMode::Original));
        assert_eq!(store.saved.borrow().last().unwrap().sort_mode, SortMode::Original);
        assert_eq!(controller.selection().song_id(), Some(&SongId::from("Level4")));
    }

    #[test]
    fn test_disabled_mode_ignored() {
        let (mut controller, host, store) = setup(SortMode::Default);
        controller.on_sort_mode_changed(SortMode::Newest);

        assert_eq!(controller.sort_mode(), SortMode::Default);
        assert!(store.saved.borrow().is_empty());
        assert_eq!(host.model().replace_count, 0);
    }

    #[test]
    fn test_cycle_sort_mode() {
        let (mut controller, _host, _) = setup(SortMode::Favorites);
        controller.cycle_sort_mode();
        assert_eq!(controller.sort_mode(), SortMode::Original);
        controller.cycle_sort_mode();
        assert_eq!(controller.sort_mode(), SortMode::Default);
        controller.cycle_sort_mode();
        assert_eq!(controller.sort_mode(), SortMode::Favorites);
    }

    #[test]
    fn test_selection_changed_updates_label() {
        let host = MemoryHost::new(catalog());
        let mut store = RecordingStore::default();
        store.initial.toggle_favorite(&SongId::from("Level3"));
        let mut controller = SessionController::new(host.bindings(), Box::new(store));
        host.show_screen();
        controller.on_catalog_loaded();
        assert_eq!(controller.label(), FavoriteLabel::NotFavorite);

        host.move_selection(1);
        controller.on_selection_changed();
        assert_eq!(controller.selection().song_id(), Some(&SongId::from("Level3")));
        assert_eq!(controller.label(), FavoriteLabel::Favorite);
        assert_eq!(host.model().favorite_label, FavoriteLabel::Favorite);

        host.move_selection(1);
        controller.on_selection_changed();
        assert_eq!(controller.label(), FavoriteLabel::NotFavorite);
    }

    #[test]
    fn test_selection_changed_without_screen() {
        let (mut controller, host, _) = setup(SortMode::Default);
        host.show_screen();
        controller.on_selection_changed();
        assert!(controller.selection().song_id().is_some());

        host.hide_screen();
        controller.on_selection_changed();
        assert_eq!(controller.selection(), &SelectionState::NoSelection);
        assert_eq!(controller.label(), FavoriteLabel::Unknown);
    }

    #[test]
    fn test_toggle_without_selection_is_noop() {
        let (mut controller, host, store) = setup(SortMode::Favorites);
        assert_eq!(controller.toggle_favorite(), None);

        assert!(controller.settings().favorites.is_empty());
        assert!(store.saved.borrow().is_empty());
        assert_eq!(controller.label(), FavoriteLabel::Unknown);
        assert_eq!(host.model().replace_count, 0);
    }

    #[test]
    fn test_toggle_twice_restores_favorites() {
        let (mut controller, host, store) = setup(SortMode::Default);
        host.show_screen();
        controller.on_catalog_loaded();
        let before = controller.settings().favorites.clone();

        assert_eq!(controller.toggle_favorite(), Some(true));
        assert_eq!(controller.label(), FavoriteLabel::Favorite);
        assert_eq!(controller.toggle_favorite(), Some(false));
        assert_eq!(controller.label(), FavoriteLabel::NotFavorite);

        assert_eq!(controller.settings().favorites, before);
        assert_eq!(store.saved.borrow().len(), 2);
    }

    #[test]
    fn test_toggle_reorders_only_in_favorites_mode() {
        let (mut controller, host, _) = setup(SortMode::Default);
        host.show_screen();
        controller.on_catalog_loaded();
        let replaced = host.model().replace_count;

        controller.toggle_favorite();
        assert_eq!(host.model().replace_count, replaced);

        controller.on_sort_mode_changed(SortMode::Favorites);
        let replaced = host.model().replace_count;
        host.move_selection(2);
        controller.on_selection_changed();
        let toggled = controller.selection().song_id().cloned().unwrap();

        controller.toggle_favorite();
        assert_eq!(host.model().replace_count, replaced + 1);
        // The toggled song stays selected after moving up
        assert_eq!(host.selected_song().unwrap().id(), &toggled);
    }

    #[test]
    fn test_toggle_favorites_order() {
        let (mut controller, host, _) = setup(SortMode::Favorites);
        host.show_screen();
        controller.on_catalog_loaded();
        assert_eq!(host_ids(&host), vec!["Level4", "Level1", "Level3"]);

        host.move_selection(2);
        controller.on_selection_changed();
        controller.toggle_favorite();
        assert_eq!(host_ids(&host), vec!["Level3", "Level4", "Level1"]);
    }

    #[test]
    fn test_persistence_failure_keeps_change() {
        let (mut controller, host, store) = setup(SortMode::Default);
        host.show_screen();
        *store.fail.borrow_mut() = true;

        assert_eq!(controller.toggle_favorite(), Some(true));
        assert_eq!(controller.settings().favorites.len(), 1);

        controller.on_sort_mode_changed(SortMode::Original);
        assert_eq!(controller.sort_mode(), SortMode::Original);
        assert!(store.saved.borrow().is_empty());
    }

    #[test]
    fn test_broken_selection_leaves_state_unchanged() {
        let host = MemoryHost::new(catalog());
        host.show_screen();
        let store = RecordingStore::default();
        let mut bindings = host.bindings();
        bindings.selection = Box::new(BrokenSelection);
        let mut controller = SessionController::new(bindings, Box::new(store.clone()));

        controller.on_selection_changed();
        assert_eq!(controller.selection(), &SelectionState::NoSelection);
        assert_eq!(controller.label(), FavoriteLabel::Unknown);

        assert_eq!(controller.toggle_favorite(), None);
        assert!(controller.settings().favorites.is_empty());
        assert!(store.saved.borrow().is_empty());

        // Reordering still works; only the selection steps are skipped
        controller.on_catalog_loaded();
        assert_eq!(host.model().replace_count, 1);
        assert_eq!(controller.selection(), &SelectionState::NoSelection);
    }

    #[test]
    fn test_busy_catalog_skips_reorder() {
        let (mut controller, host, _) = setup(SortMode::Default);
        {
            let _guard = host.model_mut();
            controller.on_catalog_loaded();
        }

        assert_eq!(host.model().replace_count, 0);
        assert_eq!(host_ids(&host), vec!["Level3", "Level1", "Level4"]);
    }

    #[test]
    fn test_busy_host_keeps_selection() {
        let (mut controller, host, _) = setup(SortMode::Default);
        host.show_screen();
        controller.on_screen_activated();
        let before = controller.selection().clone();
        assert!(before.song_id().is_some());

        {
            let _guard = host.model_mut();
            controller.on_selection_changed();
            controller.on_screen_activated();
        }

        assert_eq!(controller.selection(), &before);
    }

    #[test]
    fn test_screen_deactivated_clears_selection() {
        let (mut controller, host, _) = setup(SortMode::Default);
        host.show_screen();
        controller.on_screen_activated();
        assert!(controller.selection().song_id().is_some());

        host.hide_screen();
        controller.on_screen_deactivated();
        assert_eq!(controller.selection(), &SelectionState::NoSelection);
        assert_eq!(host.model().favorite_label, FavoriteLabel::Unknown);
    }
}
