use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::db::helpers::parse_column;
use crate::models::statistics::{MatchStatistics, StatRelation};

#[derive(sqlx::FromRow)]
struct StatisticsRow {
    id: Uuid,
    match_id: Uuid,
    goals: i32,
    assists: i32,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    statistics_id: Uuid,
    player_id: Uuid,
    relation: String,
}

/// Load the player sets for `rows`, keeping the order of `rows`.
async fn with_members(conn: &mut PgConnection, rows: Vec<StatisticsRow>) -> Result<Vec<MatchStatistics>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let members = sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT statistics_id, player_id, relation
        FROM statistic_members
        WHERE statistics_id = ANY($1)
        ORDER BY player_id
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_id: HashMap<Uuid, MatchStatistics> = rows
        .iter()
        .map(|r| {
            (
                r.id,
                MatchStatistics {
                    id: r.id,
                    match_id: r.match_id,
                    goals: r.goals,
                    assists: r.assists,
                    updated_at: r.updated_at,
                    ..Default::default()
                },
            )
        })
        .collect();

    for member in members {
        let relation: StatRelation = parse_column(&member.relation, "relation")?;
        if let Some(stats) = by_id.get_mut(&member.statistics_id) {
            stats.members_mut(relation).push(member.player_id);
        }
    }

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

pub async fn find_for_match(conn: &mut PgConnection, match_id: Uuid) -> Result<Option<MatchStatistics>, sqlx::Error> {
    let row = sqlx::query_as::<_, StatisticsRow>(
        "SELECT id, match_id, goals, assists, updated_at FROM match_statistics WHERE match_id = $1",
    )
    .bind(match_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(with_members(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Same as [`find_for_match`] but locks the row for the rest of the transaction.
pub async fn lock_for_match(conn: &mut PgConnection, match_id: Uuid) -> Result<Option<MatchStatistics>, sqlx::Error> {
    let row = sqlx::query_as::<_, StatisticsRow>(
        "SELECT id, match_id, goals, assists, updated_at FROM match_statistics WHERE match_id = $1 FOR UPDATE",
    )
    .bind(match_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(with_members(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Create or update the scalar counters, returning the record id.
pub async fn upsert_counters(conn: &mut PgConnection, match_id: Uuid, goals: i32, assists: i32) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO match_statistics (id, match_id, goals, assists)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (match_id) DO UPDATE
        SET goals = EXCLUDED.goals, assists = EXCLUDED.assists, updated_at = NOW()
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(match_id)
    .bind(goals)
    .bind(assists)
    .fetch_one(&mut *conn)
    .await
}

pub async fn replace_members(
    conn: &mut PgConnection,
    statistics_id: Uuid,
    relation: StatRelation,
    members: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM statistic_members WHERE statistics_id = $1 AND relation = $2")
        .bind(statistics_id)
        .bind(relation.as_str())
        .execute(&mut *conn)
        .await?;

    if members.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO statistic_members (statistics_id, player_id, relation)
        SELECT $1, UNNEST($2::uuid[]), $3
        "#,
    )
    .bind(statistics_id)
    .bind(members)
    .bind(relation.as_str())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Empty one player set, returning who was in it.
pub async fn clear_relation(
    conn: &mut PgConnection,
    statistics_id: Uuid,
    relation: StatRelation,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "DELETE FROM statistic_members WHERE statistics_id = $1 AND relation = $2 RETURNING player_id",
    )
    .bind(statistics_id)
    .bind(relation.as_str())
    .fetch_all(&mut *conn)
    .await
}

pub async fn for_matches(conn: &mut PgConnection, match_ids: &[Uuid]) -> Result<Vec<MatchStatistics>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StatisticsRow>(
        "SELECT id, match_id, goals, assists, updated_at FROM match_statistics WHERE match_id = ANY($1)",
    )
    .bind(match_ids)
    .fetch_all(&mut *conn)
    .await?;
    with_members(conn, rows).await
}

pub async fn all(conn: &mut PgConnection) -> Result<Vec<MatchStatistics>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StatisticsRow>(
        "SELECT id, match_id, goals, assists, updated_at FROM match_statistics",
    )
    .fetch_all(&mut *conn)
    .await?;
    with_members(conn, rows).await
}

/// Records that mention the player in any set, latest match first.
pub async fn for_player(conn: &mut PgConnection, player_id: Uuid) -> Result<Vec<MatchStatistics>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StatisticsRow>(
        r#"
        SELECT s.id, s.match_id, s.goals, s.assists, s.updated_at
        FROM match_statistics s
        JOIN matches m ON m.id = s.match_id
        WHERE EXISTS (
            SELECT 1 FROM statistic_members sm
            WHERE sm.statistics_id = s.id AND sm.player_id = $1
        )
        ORDER BY m.match_date DESC
        "#,
    )
    .bind(player_id)
    .fetch_all(&mut *conn)
    .await?;
    with_members(conn, rows).await
}
