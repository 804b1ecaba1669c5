// src/models/fixture.rs
use std::fmt;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Upcoming,
    Played,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Played => "played",
        }
    }

    /// A match counts as played once both scores are known.
    pub fn from_scores(home_score: Option<i32>, away_score: Option<i32>) -> Self {
        match (home_score, away_score) {
            (Some(_), Some(_)) => MatchStatus::Played,
            _ => MatchStatus::Upcoming,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(MatchStatus::Upcoming),
            "played" => Ok(MatchStatus::Played),
            other => Err(format!("Unknown match status: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Match {
    pub id: Uuid,
    pub tournament_id: Option<Uuid>,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub match_date: NaiveDate,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn final_score(&self) -> Option<(i32, i32)> {
        self.home_score.zip(self.away_score)
    }

    pub fn involves(&self, team_id: Uuid) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

/// Match listing row with team names resolved.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchSummary {
    #[serde(flatten)]
    pub fixture: Match,
    pub home_team_name: String,
    pub away_team_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateMatchRequest {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub match_date: NaiveDate,
    #[serde(default)]
    pub tournament_id: Option<Uuid>,
    #[serde(default)]
    pub home_score: Option<i32>,
    #[serde(default)]
    pub away_score: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct MatchResultRequest {
    pub home_score: i32,
    pub away_score: i32,
}

/// A player-of-the-match vote. One per account and match.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchVote {
    pub id: Uuid,
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct VoteRequest {
    pub player_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeaturedPlayer {
    pub player_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub votes: i64,
}

/// A match with its player-of-the-match standing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub fixture: Match,
    pub total_votes: i64,
    pub featured_player: Option<FeaturedPlayer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_scores() {
        assert_eq!(MatchStatus::from_scores(Some(2), Some(0)), MatchStatus::Played);
        assert_eq!(MatchStatus::from_scores(Some(0), Some(0)), MatchStatus::Played);
        assert_eq!(MatchStatus::from_scores(Some(1), None), MatchStatus::Upcoming);
        assert_eq!(MatchStatus::from_scores(None, None), MatchStatus::Upcoming);
    }
}
