use serde::Deserialize;
use std::collections::HashMap;

/// Normalized row types the rest of the service consumes, deserialized
/// straight from the provider's JSON.

/// One player's stat line for a season (or one week of it). Stat columns
/// ride in a flattened map keyed by column name so upstream schema drift
/// does not break deserialization; non-numeric cells are ignored by
/// [`PlayerStatRow::stat`].
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerStatRow {
    pub player_id: String,
    pub season: u16,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(flatten)]
    pub columns: HashMap<String, serde_json::Value>,
}

impl PlayerStatRow {
    /// Numeric value of a stat column, if present and numeric.
    pub fn stat(&self, column: &str) -> Option<f64> {
        self.columns.get(column).and_then(|v| v.as_f64())
    }
}

/// Player-to-team assignment for one season.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub player_id: String,
    pub season: u16,
    pub team: String,
}

/// One schedule row. Scores are absent until the game has been played.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduledGame {
    pub season: u16,
    pub week: u16,
    pub game_type: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_score: Option<f64>,
    #[serde(default)]
    pub away_score: Option<f64>,
}

impl ScheduledGame {
    pub fn is_completed(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    /// Winning team code; `None` while undecided, or on a tie.
    pub fn true_winner(&self) -> Option<&str> {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) if h > a => Some(&self.home_team),
            (Some(h), Some(a)) if a > h => Some(&self.away_team),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_row_flattens_columns() {
        let row: PlayerStatRow = serde_json::from_str(
            r#"{
                "player_id": "00-0033873",
                "season": 2024,
                "player_name": "P. Mahomes",
                "passing_yards": 4183.0,
                "passing_tds": 27
            }"#,
        )
        .unwrap();
        assert_eq!(row.team, None);
        assert_eq!(row.stat("passing_yards"), Some(4183.0));
        assert_eq!(row.stat("passing_tds"), Some(27.0));
        // Non-numeric cells are not stats.
        assert_eq!(row.stat("player_name"), None);
        assert_eq!(row.stat("rushing_yards"), None);
    }

    #[test]
    fn test_true_winner() {
        let mut game: ScheduledGame = serde_json::from_str(
            r#"{
                "season": 2024, "week": 12, "game_type": "REG",
                "home_team": "KC", "away_team": "BUF",
                "home_score": 21, "away_score": 30
            }"#,
        )
        .unwrap();
        assert!(game.is_completed());
        assert_eq!(game.true_winner(), Some("BUF"));

        game.away_score = None;
        assert!(!game.is_completed());
        assert_eq!(game.true_winner(), None);

        game.away_score = Some(21.0);
        assert_eq!(game.true_winner(), None, "tie has no winner");
    }
}
