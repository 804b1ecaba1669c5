use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::club::Team;

const TEAM_COLUMNS: &str = "id, name, image_url, created_at";

pub async fn insert_team(pool: &PgPool, name: &str, image_url: Option<&str>) -> Result<Team, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!(
        "INSERT INTO teams (id, name, image_url) VALUES ($1, $2, $3) RETURNING {}",
        TEAM_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(image_url)
    .fetch_one(pool)
    .await
}

pub async fn list_teams(pool: &PgPool) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!("SELECT {} FROM teams ORDER BY name", TEAM_COLUMNS))
        .fetch_all(pool)
        .await
}

pub async fn find_team(pool: &PgPool, team_id: Uuid) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!("SELECT {} FROM teams WHERE id = $1", TEAM_COLUMNS))
        .bind(team_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_team_by_name(pool: &PgPool, name: &str) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!("SELECT {} FROM teams WHERE name = $1", TEAM_COLUMNS))
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn update_team(
    pool: &PgPool,
    team_id: Uuid,
    name: Option<&str>,
    image_url: Option<&str>,
) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!(
        r#"
        UPDATE teams
        SET name = COALESCE($2, name),
            image_url = COALESCE($3, image_url)
        WHERE id = $1
        RETURNING {}
        "#,
        TEAM_COLUMNS
    ))
    .bind(team_id)
    .bind(name)
    .bind(image_url)
    .fetch_optional(pool)
    .await
}

pub async fn delete_team(pool: &PgPool, team_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(team_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Fetch the team called `name`, creating it first if needed.
pub async fn get_or_create_team(conn: &mut PgConnection, name: &str) -> Result<Team, sqlx::Error> {
    sqlx::query("INSERT INTO teams (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
        .bind(Uuid::new_v4())
        .bind(name)
        .execute(&mut *conn)
        .await?;

    sqlx::query_as::<_, Team>(&format!("SELECT {} FROM teams WHERE name = $1", TEAM_COLUMNS))
        .bind(name)
        .fetch_one(&mut *conn)
        .await
}
