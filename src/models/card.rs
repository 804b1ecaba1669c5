// src/models/card.rs
use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Yellow,
    Red,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Yellow => "yellow",
            CardKind::Red => "red",
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yellow" => Ok(CardKind::Yellow),
            "red" => Ok(CardKind::Red),
            other => Err(format!("Unknown card kind: {}", other)),
        }
    }
}

/// A disciplinary card shown to one player in one match.
///
/// Cards are never deleted. Voiding keeps the row for audit and removes it
/// from limit checks and display counts.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Card {
    pub id: Uuid,
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub kind: CardKind,
    pub minute: Option<i32>,
    pub issued_at: DateTime<Utc>,
    pub voided: bool,
    pub void_reason: Option<String>,
}

impl Card {
    pub fn is_active(&self) -> bool {
        !self.voided
    }

    pub fn is_active_of(&self, kind: CardKind) -> bool {
        !self.voided && self.kind == kind
    }
}

/// A card about to be persisted.
#[derive(Debug, Clone)]
pub struct NewCard {
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub kind: CardKind,
    pub minute: Option<i32>,
    pub issued_at: DateTime<Utc>,
}

impl NewCard {
    pub fn into_card(self, id: Uuid) -> Card {
        Card {
            id,
            match_id: self.match_id,
            player_id: self.player_id,
            kind: self.kind,
            minute: self.minute,
            issued_at: self.issued_at,
            voided: false,
            void_reason: None,
        }
    }
}

/// Staff request to book or send off a player.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IssueCardRequest {
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub kind: CardKind,
    #[serde(default)]
    pub minute: Option<i32>,
    /// Backdates the card when it is recorded after the match.
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VoidCardRequest {
    pub reason: String,
}

/// Non-voided card totals for one player.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardCounts {
    pub player_id: Uuid,
    pub yellow: u32,
    pub red: u32,
}

impl CardCounts {
    pub fn tally<'a>(player_id: Uuid, cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut counts = CardCounts { player_id, ..Default::default() };
        for card in cards.into_iter().filter(|c| c.player_id == player_id && c.is_active()) {
            match card.kind {
                CardKind::Yellow => counts.yellow += 1,
                CardKind::Red => counts.red += 1,
            }
        }
        counts
    }
}
