use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::club::{Team, Tournament};

const TOURNAMENT_COLUMNS: &str = "id, name, start_date, end_date, created_at";

pub async fn insert_tournament(
    conn: &mut PgConnection,
    name: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<Tournament, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(&format!(
        "INSERT INTO tournaments (id, name, start_date, end_date) VALUES ($1, $2, $3, $4) RETURNING {}",
        TOURNAMENT_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(conn)
    .await
}

pub async fn list_tournaments(pool: &PgPool) -> Result<Vec<Tournament>, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(&format!(
        "SELECT {} FROM tournaments ORDER BY start_date DESC, name",
        TOURNAMENT_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

pub async fn find_tournament(pool: &PgPool, tournament_id: Uuid) -> Result<Option<Tournament>, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(&format!("SELECT {} FROM tournaments WHERE id = $1", TOURNAMENT_COLUMNS))
        .bind(tournament_id)
        .fetch_optional(pool)
        .await
}

pub async fn tournament_teams(pool: &PgPool, tournament_id: Uuid) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT t.id, t.name, t.image_url, t.created_at
        FROM teams t
        JOIN tournament_teams tt ON tt.team_id = t.id
        WHERE tt.tournament_id = $1
        ORDER BY t.name
        "#,
    )
    .bind(tournament_id)
    .fetch_all(pool)
    .await
}

/// Replace the participating teams of a tournament.
pub async fn set_tournament_teams(
    conn: &mut PgConnection,
    tournament_id: Uuid,
    team_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tournament_teams WHERE tournament_id = $1")
        .bind(tournament_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO tournament_teams (tournament_id, team_id)
        SELECT $1, UNNEST($2::uuid[])
        "#,
    )
    .bind(tournament_id)
    .bind(team_ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete_tournament(pool: &PgPool, tournament_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
        .bind(tournament_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
