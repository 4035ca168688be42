// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rank table for the game's own level order.

use crate::catalog::SongId;

/// Stock level ids with their rank; higher ranks are listed first
pub const ORIGINAL_RANKS: [(&str, u32); 10] = [
    ("Level4", 10),
    ("Level2", 9),
    ("Level9", 8),
    ("Level5", 7),
    ("Level10", 6),
    ("Level6", 5),
    ("Level7", 4),
    ("Level1", 3),
    ("Level3", 2),
    ("Level8", 1),
];

/// Rank of a song in the original order, 0 for anything not in the table
pub fn original_rank(id: &SongId) -> u32 {
    ORIGINAL_RANKS
        .iter()
        .find(|(level, _)| *level == id.as_str())
        .map(|&(_, rank)| rank)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ranks() {
        assert_eq!(original_rank(&SongId::from("Level4")), 10);
        assert_eq!(original_rank(&SongId::from("Level8")), 1);
        assert_eq!(original_rank(&SongId::from("Level10")), 6);
    }

    #[test]
    fn test_unknown_rank_is_zero() {
        assert_eq!(original_rank(&SongId::from("custom_song")), 0);
        assert_eq!(original_rank(&SongId::from("level4")), 0);
    }

    #[test]
    fn test_ranks_are_distinct() {
        let mut ranks: Vec<u32> = ORIGINAL_RANKS.iter().map(|&(_, r)| r).collect();
        ranks.sort_unstable();
        ranks.dedup();
        assert_eq!(ranks.len(), ORIGINAL_RANKS.len());
    }
}
