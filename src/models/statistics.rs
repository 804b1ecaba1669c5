// src/models/statistics.rs
use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::card::{Card, CardKind};
use crate::models::club::Player;

/// Player sets attached to a match's statistics record.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatRelation {
    Scorers,
    Assisters,
    Booked,
    SentOff,
}

impl StatRelation {
    pub const ALL: [StatRelation; 4] = [
        StatRelation::Scorers,
        StatRelation::Assisters,
        StatRelation::Booked,
        StatRelation::SentOff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatRelation::Scorers => "scorers",
            StatRelation::Assisters => "assisters",
            StatRelation::Booked => "booked",
            StatRelation::SentOff => "sent_off",
        }
    }

    /// The card kind a membership in this relation stands for.
    pub fn card_kind(&self) -> Option<CardKind> {
        match self {
            StatRelation::Booked => Some(CardKind::Yellow),
            StatRelation::SentOff => Some(CardKind::Red),
            StatRelation::Scorers | StatRelation::Assisters => None,
        }
    }
}

impl fmt::Display for StatRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatRelation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scorers" => Ok(StatRelation::Scorers),
            "assisters" => Ok(StatRelation::Assisters),
            "booked" => Ok(StatRelation::Booked),
            "sent_off" => Ok(StatRelation::SentOff),
            other => Err(format!("Unknown statistics relation: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MatchStatistics {
    pub id: Uuid,
    pub match_id: Uuid,
    pub goals: i32,
    pub assists: i32,
    pub scorers: Vec<Uuid>,
    pub assisters: Vec<Uuid>,
    pub booked: Vec<Uuid>,
    pub sent_off: Vec<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl MatchStatistics {
    pub fn members(&self, relation: StatRelation) -> &[Uuid] {
        match relation {
            StatRelation::Scorers => &self.scorers,
            StatRelation::Assisters => &self.assisters,
            StatRelation::Booked => &self.booked,
            StatRelation::SentOff => &self.sent_off,
        }
    }

    pub fn members_mut(&mut self, relation: StatRelation) -> &mut Vec<Uuid> {
        match relation {
            StatRelation::Scorers => &mut self.scorers,
            StatRelation::Assisters => &mut self.assisters,
            StatRelation::Booked => &mut self.booked,
            StatRelation::SentOff => &mut self.sent_off,
        }
    }

    pub fn includes(&self, player_id: Uuid) -> bool {
        StatRelation::ALL
            .iter()
            .any(|r| self.members(*r).contains(&player_id))
    }
}

/// Staff edit of a match's statistics. Player sets replace the stored ones.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StatisticsForm {
    #[serde(default)]
    pub goals: i32,
    #[serde(default)]
    pub assists: i32,
    #[serde(default)]
    pub scorers: Vec<Uuid>,
    #[serde(default)]
    pub assisters: Vec<Uuid>,
    #[serde(default)]
    pub booked: Vec<Uuid>,
    #[serde(default)]
    pub sent_off: Vec<Uuid>,
}

impl StatisticsForm {
    pub fn members(&self, relation: StatRelation) -> &[Uuid] {
        match relation {
            StatRelation::Scorers => &self.scorers,
            StatRelation::Assisters => &self.assisters,
            StatRelation::Booked => &self.booked,
            StatRelation::SentOff => &self.sent_off,
        }
    }
}

/// Goals, assists and active cards for one player over some set of matches.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerStatLine {
    pub player_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub team_id: Option<Uuid>,
    pub goals: i64,
    pub assists: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Leader {
    pub player_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub value: i64,
}

/// Club-wide numbers for the statistics page.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClubOverview {
    pub top_scorer: Option<Leader>,
    pub top_assister: Option<Leader>,
    pub most_yellow_cards: Option<Leader>,
    pub most_red_cards: Option<Leader>,
    pub yellow_cards_total: i64,
    pub red_cards_total: i64,
    pub win_percentage: f64,
    pub players: Vec<PlayerStatLine>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StandingRow {
    pub team_id: Uuid,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

/// Staff view of everything recorded against one player.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerDebugView {
    pub player: Player,
    pub statistics: Vec<MatchStatistics>,
    /// Voided cards included, newest first.
    pub cards: Vec<Card>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_card_relations_map_to_kinds() {
        assert_eq!(StatRelation::Booked.card_kind(), Some(CardKind::Yellow));
        assert_eq!(StatRelation::SentOff.card_kind(), Some(CardKind::Red));
        assert_eq!(StatRelation::Scorers.card_kind(), None);
        assert_eq!(StatRelation::Assisters.card_kind(), None);
    }

    #[test]
    fn relation_names_match_path_segments() {
        for relation in StatRelation::ALL {
            assert_eq!(relation.as_str().parse::<StatRelation>(), Ok(relation));
        }
        assert_eq!(
            serde_json::to_string(&StatRelation::SentOff).unwrap(),
            "\"sent_off\""
        );
    }

    #[test]
    fn includes_checks_every_relation() {
        let p = Uuid::new_v4();
        let stats = MatchStatistics { sent_off: vec![p], ..Default::default() };
        assert!(stats.includes(p));
        assert!(!stats.includes(Uuid::new_v4()));
    }
}
