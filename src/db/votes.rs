use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::fixture::MatchVote;

#[derive(sqlx::FromRow)]
struct MatchVoteRow {
    id: Uuid,
    match_id: Uuid,
    player_id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<MatchVoteRow> for MatchVote {
    fn from(row: MatchVoteRow) -> Self {
        MatchVote {
            id: row.id,
            match_id: row.match_id,
            player_id: row.player_id,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

pub async fn insert_vote(
    pool: &PgPool,
    match_id: Uuid,
    player_id: Uuid,
    user_id: Uuid,
) -> Result<MatchVote, sqlx::Error> {
    let row = sqlx::query_as::<_, MatchVoteRow>(
        r#"
        INSERT INTO match_votes (id, match_id, player_id, user_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, match_id, player_id, user_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(match_id)
    .bind(player_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}

pub async fn votes_for_match(pool: &PgPool, match_id: Uuid) -> Result<Vec<MatchVote>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MatchVoteRow>(
        r#"
        SELECT id, match_id, player_id, user_id, created_at
        FROM match_votes
        WHERE match_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(match_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(MatchVote::from).collect())
}
