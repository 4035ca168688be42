// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song catalog model.
//!
//! Songs are owned by the host; this module only describes them and
//! provides the permutation check that guards every catalog replacement.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Stable identity of a song (the host's level id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
    /// Create a new song id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SongId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SongId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SongId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A song as exposed by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    id: SongId,
    title: String,
    author: String,
}

impl Song {
    /// Create a new song
    pub fn new(id: impl Into<SongId>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
        }
    }

    /// Get song id
    pub fn id(&self) -> &SongId {
        &self.id
    }

    /// Get song title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get song author
    pub fn author(&self) -> &str {
        &self.author
    }
}

/// Check that `candidate` holds exactly the same song identities as `current`.
///
/// Order is ignored. Duplicates count, so a list that repeats one song in
/// place of another is rejected.
pub fn is_permutation(current: &[Song], candidate: &[Song]) -> bool {
    if current.len() != candidate.len() {
        return false;
    }

    let mut counts: HashMap<&SongId, i64> = HashMap::with_capacity(current.len());
    for song in current {
        *counts.entry(song.id()).or_insert(0) += 1;
    }
    for song in candidate {
        match counts.get_mut(song.id()) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }

    counts.values().all(|&c| c == 0)
}

/// Catalog description file used to seed a host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogFile {
    /// Songs in canonical (host-defined) order
    #[serde(default)]
    pub songs: Vec<Song>,
}

impl CatalogFile {
    /// Load a catalog from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read catalog file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a catalog from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: Self = serde_yaml::from_str(yaml).context("Failed to parse catalog YAML")?;
        file.check_unique_ids()?;
        Ok(file)
    }

    fn check_unique_ids(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::with_capacity(self.songs.len());
        for song in &self.songs {
            if !seen.insert(song.id()) {
                anyhow::bail!("Duplicate song id in catalog: {}", song.id());
            }
        }
        Ok(())
    }
}

/// The ten stock levels, in the order the game ships them
pub fn builtin_catalog() -> Vec<Song> {
    vec![
        Song::new("Level1", "Beat Saber", "Jaroslav Beck"),
        Song::new("Level2", "Escape", "Jaroslav Beck"),
        Song::new("Level3", "Legend", "Jaroslav Beck"),
        Song::new("Level4", "Country Rounds", "Jaroslav Beck"),
        Song::new("Level5", "Breezer", "Jaroslav Beck"),
        Song::new("Level6", "Turn Me On", "Jaroslav Beck"),
        Song::new("Level7", "Balearic Pumping", "Jaroslav Beck"),
        Song::new("Level8", "Lvl Insane", "Jaroslav Beck"),
        Song::new("Level9", "Commercial Pumping", "Jaroslav Beck"),
        Song::new("Level10", "Angel Voices", "Virtual Self"),
    ]
}
