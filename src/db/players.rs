use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db::helpers::parse_column;
use crate::models::club::{current_age, Player, Position, UpdatePlayerRequest};

const PLAYER_COLUMNS: &str = "id, user_id, first_name, last_name, national_id, birth_date, age, \
                              position, shirt_number, image_url, team_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: Uuid,
    user_id: Option<Uuid>,
    first_name: String,
    last_name: String,
    national_id: String,
    birth_date: Option<NaiveDate>,
    age: Option<i16>,
    position: String,
    shirt_number: Option<i32>,
    image_url: Option<String>,
    team_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlayerRow> for Player {
    type Error = sqlx::Error;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        Ok(Player {
            id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            national_id: row.national_id,
            birth_date: row.birth_date,
            age: row.age,
            position: parse_column(&row.position, "position")?,
            shirt_number: row.shirt_number,
            image_url: row.image_url,
            team_id: row.team_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_players(rows: Vec<PlayerRow>) -> Result<Vec<Player>, sqlx::Error> {
    rows.into_iter().map(Player::try_from).collect()
}

/// Columns of a new player profile. Age is derived on insert.
#[derive(Debug, Clone)]
pub struct NewPlayer<'a> {
    pub user_id: Option<Uuid>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub national_id: &'a str,
    pub birth_date: Option<NaiveDate>,
    pub position: Position,
    pub shirt_number: Option<i32>,
    pub image_url: Option<&'a str>,
    pub team_id: Option<Uuid>,
}

pub async fn insert_player(conn: &mut PgConnection, player: &NewPlayer<'_>) -> Result<Player, sqlx::Error> {
    let row = sqlx::query_as::<_, PlayerRow>(&format!(
        r#"
        INSERT INTO players (id, user_id, first_name, last_name, national_id, birth_date, age,
                             position, shirt_number, image_url, team_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {}
        "#,
        PLAYER_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(player.user_id)
    .bind(player.first_name)
    .bind(player.last_name)
    .bind(player.national_id)
    .bind(player.birth_date)
    .bind(current_age(player.birth_date))
    .bind(player.position.as_str())
    .bind(player.shirt_number)
    .bind(player.image_url)
    .bind(player.team_id)
    .fetch_one(conn)
    .await?;
    Player::try_from(row)
}

pub async fn list_players(pool: &PgPool, limit: i64, offset: i64) -> Result<(Vec<Player>, i64), sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
        .fetch_one(pool)
        .await?;
    let rows = sqlx::query_as::<_, PlayerRow>(&format!(
        "SELECT {} FROM players ORDER BY last_name, first_name LIMIT $1 OFFSET $2",
        PLAYER_COLUMNS
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok((into_players(rows)?, total))
}

pub async fn all_players(pool: &PgPool) -> Result<Vec<Player>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PlayerRow>(&format!(
        "SELECT {} FROM players ORDER BY last_name, first_name",
        PLAYER_COLUMNS
    ))
    .fetch_all(pool)
    .await?;
    into_players(rows)
}

pub async fn players_of_teams(pool: &PgPool, team_ids: &[Uuid]) -> Result<Vec<Player>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PlayerRow>(&format!(
        "SELECT {} FROM players WHERE team_id = ANY($1) ORDER BY last_name, first_name",
        PLAYER_COLUMNS
    ))
    .bind(team_ids)
    .fetch_all(pool)
    .await?;
    into_players(rows)
}

pub async fn find_player(pool: &PgPool, player_id: Uuid) -> Result<Option<Player>, sqlx::Error> {
    let row = sqlx::query_as::<_, PlayerRow>(&format!("SELECT {} FROM players WHERE id = $1", PLAYER_COLUMNS))
        .bind(player_id)
        .fetch_optional(pool)
        .await?;
    row.map(Player::try_from).transpose()
}

pub async fn find_player_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Player>, sqlx::Error> {
    let row = sqlx::query_as::<_, PlayerRow>(&format!("SELECT {} FROM players WHERE user_id = $1", PLAYER_COLUMNS))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    row.map(Player::try_from).transpose()
}

/// Apply a profile update and recompute the age from the resulting birth date.
pub async fn update_player(
    pool: &PgPool,
    player_id: Uuid,
    changes: &UpdatePlayerRequest,
) -> Result<Option<Player>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let current: Option<Option<NaiveDate>> =
        sqlx::query_scalar("SELECT birth_date FROM players WHERE id = $1 FOR UPDATE")
            .bind(player_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(current_birth_date) = current else {
        return Ok(None);
    };
    let birth_date = changes.birth_date.or(current_birth_date);

    let row = sqlx::query_as::<_, PlayerRow>(&format!(
        r#"
        UPDATE players
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            birth_date = $4,
            age = $5,
            position = COALESCE($6, position),
            shirt_number = COALESCE($7, shirt_number),
            image_url = COALESCE($8, image_url),
            team_id = COALESCE($9, team_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        PLAYER_COLUMNS
    ))
    .bind(player_id)
    .bind(changes.first_name.as_deref().map(str::trim))
    .bind(changes.last_name.as_deref().map(str::trim))
    .bind(birth_date)
    .bind(current_age(birth_date))
    .bind(changes.position.map(|p| p.as_str()))
    .bind(changes.shirt_number)
    .bind(changes.image_url.as_deref())
    .bind(changes.team_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Player::try_from(row).map(Some)
}

pub async fn delete_player(pool: &PgPool, player_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM players WHERE id = $1")
        .bind(player_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
