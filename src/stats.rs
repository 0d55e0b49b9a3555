//! Lifetime statistics and the chip rank derived from them.
//!
//! Counters are `u32`, the same width as a game score.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::{field, parse_object};

/// Lifetime results across games, persisted as a flat JSON object.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub games_played: u32,
    pub games_won: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub best_score: u32,
}

/// Player standing shown next to the score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChipRank {
    Bronze,
    Silver,
    Gold,
}

impl fmt::Display for ChipRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChipRank::Bronze => "Bronze Chip",
            ChipRank::Silver => "Silver Chip",
            ChipRank::Gold => "Gold Chip",
        })
    }
}

impl Statistics {
    pub fn record_game_started(&mut self) {
        self.games_played += 1;
    }

    pub fn record_win(&mut self, score: u32) {
        self.games_won += 1;
        self.current_streak += 1;
        self.best_streak = self.best_streak.max(self.current_streak);
        self.best_score = self.best_score.max(score);
    }

    /// An unfinished game was left for a new one.
    pub fn record_abandoned(&mut self) {
        self.current_streak = 0;
    }

    pub fn reset(&mut self) {
        *self = Statistics::default();
    }

    /// Win rate as a whole percentage, 0 before any game.
    pub fn win_rate_percent(&self) -> u32 {
        if self.games_played == 0 {
            0
        } else {
            (self.games_won as f64 / self.games_played as f64 * 100.0).round() as u32
        }
    }

    pub fn rank(&self) -> ChipRank {
        if self.current_streak >= 5 || self.games_won >= 20 {
            ChipRank::Gold
        } else if self.current_streak >= 3 || self.games_won >= 10 {
            ChipRank::Silver
        } else {
            ChipRank::Bronze
        }
    }

    /// Parse a stored blob, defaulting each unreadable field independently.
    pub fn from_json_lenient(raw: &str) -> Self {
        let Some(obj) = parse_object(raw, "statistics") else {
            return Statistics::default();
        };
        Statistics {
            games_played: field(&obj, "gamesPlayed").unwrap_or_default(),
            games_won: field(&obj, "gamesWon").unwrap_or_default(),
            current_streak: field(&obj, "currentStreak").unwrap_or_default(),
            best_streak: field(&obj, "bestStreak").unwrap_or_default(),
            best_score: field(&obj, "bestScore").unwrap_or_default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wins_update_streaks_and_best_score() {
        let mut stats = Statistics::default();
        stats.record_game_started();
        stats.record_win(420);
        stats.record_game_started();
        stats.record_win(300);
        assert_eq!(stats.games_won, 2);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.best_score, 420);

        stats.record_abandoned();
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.best_streak, 2);
    }

    #[test]
    fn win_rate_rounds_and_handles_zero_games() {
        let mut stats = Statistics::default();
        assert_eq!(stats.win_rate_percent(), 0);
        stats.games_played = 3;
        stats.games_won = 2;
        assert_eq!(stats.win_rate_percent(), 67);
    }

    #[test]
    fn rank_thresholds() {
        let mut stats = Statistics::default();
        assert_eq!(stats.rank(), ChipRank::Bronze);
        stats.current_streak = 3;
        assert_eq!(stats.rank(), ChipRank::Silver);
        stats.current_streak = 0;
        stats.games_won = 20;
        assert_eq!(stats.rank(), ChipRank::Gold);
        assert_eq!(stats.rank().to_string(), "Gold Chip");
    }

    #[test]
    fn lenient_load_keeps_good_fields() {
        let stats = Statistics::from_json_lenient(
            r#"{"gamesPlayed": 12, "gamesWon": "lots", "bestScore": -5, "bestStreak": 4}"#,
        );
        assert_eq!(stats.games_played, 12);
        assert_eq!(stats.games_won, 0);
        assert_eq!(stats.best_score, 0);
        assert_eq!(stats.best_streak, 4);
        assert_eq!(stats.current_streak, 0);

        assert_eq!(Statistics::from_json_lenient("{"), Statistics::default());
    }

    #[test]
    fn counters_too_wide_for_u32_fall_back_to_zero() {
        let stats = Statistics::from_json_lenient(
            r#"{"gamesPlayed": 4294967296, "gamesWon": 7, "bestScore": 4294967295}"#,
        );
        assert_eq!(stats.games_played, 0);
        assert_eq!(stats.games_won, 7);
        assert_eq!(stats.best_score, u32::MAX);
    }
}
