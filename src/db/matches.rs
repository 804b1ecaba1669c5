use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::parse_column;
use crate::models::fixture::{CreateMatchRequest, Match, MatchStatus, MatchSummary};

const MATCH_COLUMNS: &str = "m.id, m.tournament_id, m.home_team_id, m.away_team_id, m.match_date, \
                             m.home_score, m.away_score, m.status, m.created_at";

#[derive(sqlx::FromRow)]
struct MatchRow {
    id: Uuid,
    tournament_id: Option<Uuid>,
    home_team_id: Uuid,
    away_team_id: Uuid,
    match_date: NaiveDate,
    home_score: Option<i32>,
    away_score: Option<i32>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MatchRow> for Match {
    type Error = sqlx::Error;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        Ok(Match {
            id: row.id,
            tournament_id: row.tournament_id,
            home_team_id: row.home_team_id,
            away_team_id: row.away_team_id,
            match_date: row.match_date,
            home_score: row.home_score,
            away_score: row.away_score,
            status: parse_column(&row.status, "status")?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MatchSummaryRow {
    #[sqlx(flatten)]
    fixture: MatchRow,
    home_team_name: String,
    away_team_name: String,
}

fn into_matches(rows: Vec<MatchRow>) -> Result<Vec<Match>, sqlx::Error> {
    rows.into_iter().map(Match::try_from).collect()
}

pub async fn insert_match(pool: &PgPool, request: &CreateMatchRequest) -> Result<Match, sqlx::Error> {
    let status = MatchStatus::from_scores(request.home_score, request.away_score);
    let row = sqlx::query_as::<_, MatchRow>(&format!(
        r#"
        INSERT INTO matches AS m (id, tournament_id, home_team_id, away_team_id, match_date,
                                  home_score, away_score, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        MATCH_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(request.tournament_id)
    .bind(request.home_team_id)
    .bind(request.away_team_id)
    .bind(request.match_date)
    .bind(request.home_score)
    .bind(request.away_score)
    .bind(status.as_str())
    .fetch_one(pool)
    .await?;
    Match::try_from(row)
}

/// Results listing, newest first.
pub async fn list_match_summaries(pool: &PgPool, limit: i64, offset: i64) -> Result<(Vec<MatchSummary>, i64), sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM matches")
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query_as::<_, MatchSummaryRow>(&format!(
        r#"
        SELECT {}, home.name AS home_team_name, away.name AS away_team_name
        FROM matches m
        JOIN teams home ON home.id = m.home_team_id
        JOIN teams away ON away.id = m.away_team_id
        ORDER BY m.match_date DESC, m.created_at DESC
        LIMIT $1 OFFSET $2
        "#,
        MATCH_COLUMNS
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let summaries = rows
        .into_iter()
        .map(|row| {
            Ok(MatchSummary {
                fixture: Match::try_from(row.fixture)?,
                home_team_name: row.home_team_name,
                away_team_name: row.away_team_name,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;
    Ok((summaries, total))
}

pub async fn find_match(pool: &PgPool, match_id: Uuid) -> Result<Option<Match>, sqlx::Error> {
    let row = sqlx::query_as::<_, MatchRow>(&format!("SELECT {} FROM matches m WHERE m.id = $1", MATCH_COLUMNS))
        .bind(match_id)
        .fetch_optional(pool)
        .await?;
    row.map(Match::try_from).transpose()
}

pub async fn record_result(
    pool: &PgPool,
    match_id: Uuid,
    home_score: i32,
    away_score: i32,
) -> Result<Option<Match>, sqlx::Error> {
    let row = sqlx::query_as::<_, MatchRow>(&format!(
        r#"
        UPDATE matches AS m
        SET home_score = $2, away_score = $3, status = $4
        WHERE m.id = $1
        RETURNING {}
        "#,
        MATCH_COLUMNS
    ))
    .bind(match_id)
    .bind(home_score)
    .bind(away_score)
    .bind(MatchStatus::Played.as_str())
    .fetch_optional(pool)
    .await?;
    row.map(Match::try_from).transpose()
}

pub async fn tournament_matches(pool: &PgPool, tournament_id: Uuid) -> Result<Vec<Match>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MatchRow>(&format!(
        "SELECT {} FROM matches m WHERE m.tournament_id = $1 ORDER BY m.match_date",
        MATCH_COLUMNS
    ))
    .bind(tournament_id)
    .fetch_all(pool)
    .await?;
    into_matches(rows)
}

pub async fn all_matches(pool: &PgPool) -> Result<Vec<Match>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MatchRow>(&format!(
        "SELECT {} FROM matches m ORDER BY m.match_date",
        MATCH_COLUMNS
    ))
    .fetch_all(pool)
    .await?;
    into_matches(rows)
}
