// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Persisted browser settings.
//!
//! Holds the active sort mode and the favorites set. Settings live in a
//! YAML file by default; a `.toml` extension switches to TOML.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::catalog::SongId;
use crate::error::BrowserError;
use crate::sorting::SortMode;

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "song_browser.yaml";

/// Root settings document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BrowserSettings {
    /// Active sort mode
    pub sort_mode: SortMode,
    /// Favorited song ids
    #[serde(serialize_with = "sorted_ids")]
    pub favorites: HashSet<SongId>,
}

/// Write the favorites set in a stable order
fn sorted_ids<S: Serializer>(
    ids: &HashSet<SongId>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut sorted: Vec<&SongId> = ids.iter().collect();
    sorted.sort();
    serializer.collect_seq(sorted)
}

impl BrowserSettings {
    /// Load settings from a file, picking the format from its extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        match SettingsFormat::from_path(path) {
            SettingsFormat::Yaml => Self::from_yaml(&contents),
            SettingsFormat::Toml => Self::from_toml(&contents),
        }
    }

    /// Parse settings from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid, default document
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(yaml).context("Failed to parse settings YAML")?;
        Ok(settings.normalized())
    }

    /// Parse settings from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).context("Failed to parse settings TOML")?;
        Ok(settings.normalized())
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize settings to YAML")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize settings to TOML")
    }

    /// Save settings to a file, picking the format from its extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = match SettingsFormat::from_path(path) {
            SettingsFormat::Yaml => self.to_yaml()?,
            SettingsFormat::Toml => self.to_toml()?,
        };
        fs::write(path, text).with_context(|| format!("Failed to write settings file: {:?}", path))
    }

    /// Check favorite membership
    pub fn is_favorite(&self, id: &SongId) -> bool {
        self.favorites.contains(id)
    }

    /// Flip favorite membership, returning true if the song is now a favorite
    pub fn toggle_favorite(&mut self, id: &SongId) -> bool {
        if self.favorites.remove(id) {
            false
        } else {
            self.favorites.insert(id.clone());
            true
        }
    }

    /// Disabled sort modes are never restored
    fn normalized(mut self) -> Self {
        let mode = self.sort_mode.normalized();
        if mode != self.sort_mode {
            debug!("Persisted sort mode {} is disabled, using {}", self.sort_mode, mode);
            self.sort_mode = mode;
        }
        self
    }
}

/// On-disk settings format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// YAML (default)
    Yaml,
    /// TOML
    Toml,
}

impl SettingsFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => SettingsFormat::Toml,
            _ => SettingsFormat::Yaml,
        }
    }
}

/// Storage for browser settings.
///
/// `save` is called synchronously after every mutation.
pub trait SettingsStore {
    /// Load stored settings, or defaults when nothing is stored yet
    fn load(&self) -> crate::error::Result<BrowserSettings>;

    /// Persist settings
    fn save(&mut self, settings: &BrowserSettings) -> crate::error::Result<()>;
}

/// Settings store backed by a single file
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Create a store for the given path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Get the settings file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults on any failure.
    ///
    /// Used at startup, where a broken settings file must not stop the browser.
    pub fn load_or_default(&self) -> BrowserSettings {
        match SettingsStore::load(self) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{}; using default settings", e);
                BrowserSettings::default()
            }
        }
    }

    /// Where an unparseable settings file is moved before it is overwritten
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Move an existing file that no longer parses out of the way.
    ///
    /// A session started from defaults must not destroy settings the user
    /// can still repair by hand. If the move fails, the save is refused.
    fn set_aside_unreadable(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        if let Err(e) = BrowserSettings::load(&self.path) {
            let backup = self.backup_path();
            warn!("{:#}; moving it to {:?}", e, backup);
            fs::rename(&self.path, &backup)
                .with_context(|| format!("Failed to move unreadable settings to {:?}", backup))?;
        }
        Ok(())
    }

    fn persistence_error(&self, err: anyhow::Error) -> BrowserError {
        BrowserError::ConfigPersistence {
            path: self.path.clone(),
            reason: format!("{:#}", err),
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> crate::error::Result<BrowserSettings> {
        if !self.path.exists() {
            debug!("No settings file at {:?}, using defaults", self.path);
            return Ok(BrowserSettings::default());
        }
        BrowserSettings::load(&self.path).map_err(|e| self.persistence_error(e))
    }

    fn save(&mut self, settings: &BrowserSettings) -> crate::error::Result<()> {
        self.set_aside_unreadable()
            .and_then(|()| settings.save(&self.path))
            .map_err(|e| self.persistence_error(e))?;
        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}
