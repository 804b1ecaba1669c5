// src/models/club.rs
use std::fmt;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Forward,
    #[default]
    Midfielder,
    Defender,
    Goalkeeper,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Forward => "forward",
            Position::Midfielder => "midfielder",
            Position::Defender => "defender",
            Position::Goalkeeper => "goalkeeper",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Position::Forward),
            "midfielder" => Ok(Position::Midfielder),
            "defender" => Ok(Position::Defender),
            "goalkeeper" => Ok(Position::Goalkeeper),
            other => Err(format!("Unknown position: {}", other)),
        }
    }
}

/// A club member's sporting profile. `age` is derived from `birth_date`
/// whenever the profile is written.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Player {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<i16>,
    pub position: Position,
    pub shirt_number: Option<i32>,
    pub image_url: Option<String>,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Whole years between `birth_date` and `today`. `None` for dates in the future.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> Option<i16> {
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    if years < 0 {
        return None;
    }
    i16::try_from(years).ok()
}

pub fn current_age(birth_date: Option<NaiveDate>) -> Option<i16> {
    birth_date.and_then(|dob| age_on(dob, Utc::now().date_naive()))
}

/// Staff form for a player profile. Without `team_id` the player joins the
/// club's default team.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreatePlayerRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub shirt_number: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdatePlayerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub position: Option<Position>,
    pub shirt_number: Option<i32>,
    pub image_url: Option<String>,
    /// Only honoured for staff.
    pub team_id: Option<Uuid>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TournamentWithTeams {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub teams: Vec<Team>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateTournamentRequest {
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub team_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SetTournamentTeamsRequest {
    pub team_ids: Vec<Uuid>,
}
